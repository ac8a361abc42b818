//! Prime factorization of `u64` values.
//!
//! Small factors are found by trial division. Anything left over is checked
//! with a deterministic Miller-Rabin test and split with Pollard's rho.

const FIRST_PRIMES: [u64; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Witnesses that make Miller-Rabin exact for every `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }

    for p in FIRST_PRIMES {
        if n % p == 0 {
            return n == p;
        }
    }

    if n < 97 * 97 {
        return true;
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    WITNESSES.iter().all(|&a| passes_miller_rabin(a, d, s, n))
}

fn passes_miller_rabin(a: u64, d: u64, s: u32, n: u64) -> bool {
    let mut x = pow_mod(a, d, n);
    if x == 1 || x == n - 1 {
        return true;
    }

    for _ in 1..s {
        x = mul_mod(x, x, n);
        if x == n - 1 {
            return true;
        }
    }

    false
}

fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    ((a as u128 * b as u128) % n as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, n: u64) -> u64 {
    let mut result = 1;
    base %= n;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, n);
        }
        base = mul_mod(base, base, n);
        exp >>= 1;
    }
    result
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Pollard's rho with Brent's cycle detection. `n` must be composite.
fn pollard_rho(n: u64) -> u64 {
    for t in 1..n {
        let step = |x: u64| ((mul_mod(x, x, n) as u128 + t as u128) % n as u128) as u64;

        let (mut power, mut length) = (1_u64, 1_u64);
        let mut tortoise = 2;
        let mut hare = step(tortoise);
        let mut factor = gcd(n, tortoise.abs_diff(hare));

        while factor == 1 {
            if power == length {
                tortoise = hare;
                power *= 2;
                length = 0;
            }
            hare = step(hare);
            length += 1;
            factor = gcd(n, tortoise.abs_diff(hare));
        }

        if factor < n {
            return factor;
        }
    }

    n
}

/// Smallest prime factor of `n`, which must be greater than one.
pub fn find_prime_factor(n: u64) -> u64 {
    for p in FIRST_PRIMES {
        if n % p == 0 {
            return p;
        }
        if p * p > n {
            return n;
        }
    }

    if is_prime(n) {
        return n;
    }

    // Rho finds some factor, not necessarily the smallest or a prime one.
    let mut smallest = n;
    let mut pending = vec![n];
    while let Some(m) = pending.pop() {
        if is_prime(m) {
            smallest = smallest.min(m);
            continue;
        }
        let f = pollard_rho(m);
        if f == m {
            smallest = smallest.min(m);
            continue;
        }
        pending.push(f);
        pending.push(m / f);
    }
    smallest
}

/// Number of times `factor` divides `n`, along with what remains.
pub fn multiplicity(factor: u64, mut n: u64) -> (u32, u64) {
    let mut count = 0;
    while n % factor == 0 {
        n /= factor;
        count += 1;
    }
    (count, n)
}

/// `(prime, exponent)` pairs in increasing prime order. One factors to nothing.
pub fn prime_factorization(mut n: u64) -> Vec<(u64, u32)> {
    assert!(n > 0, "cannot factor zero");

    let mut factors = Vec::new();
    while n > 1 {
        let p = find_prime_factor(n);
        let (count, rest) = multiplicity(p, n);
        factors.push((p, count));
        n = rest;
    }
    factors
}
