//! The usual arithmetic conversions, restricted to the scalar kinds we model.

use crate::ScalarKind;

/// Integer promotion: anything narrower than 32 bits becomes `i32`.
pub fn promoted(kind: ScalarKind) -> ScalarKind {
    if kind.is_integral() && kind.size() < 4 {
        ScalarKind::I32
    } else {
        kind
    }
}

/// The type both operands end up in when combined by a binary arithmetic
/// operation.
pub fn common_kind(a: ScalarKind, b: ScalarKind) -> ScalarKind {
    match (a.is_float(), b.is_float()) {
        (true, true) => wider(a, b),
        (true, false) => a,
        (false, true) => b,
        (false, false) => {
            let (a, b) = (promoted(a), promoted(b));
            if a.is_signed() == b.is_signed() {
                return wider(a, b);
            }

            let (signed, unsigned) = if a.is_signed() { (a, b) } else { (b, a) };
            // A strictly wider signed type always holds every unsigned value.
            if unsigned.size() >= signed.size() {
                unsigned
            } else {
                signed
            }
        }
    }
}

fn wider(a: ScalarKind, b: ScalarKind) -> ScalarKind {
    if b.size() > a.size() {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{common_kind, promoted};
    use crate::ScalarKind::{self, *};

    #[test]
    fn small_integers_promote() {
        assert_eq!(promoted(U8), I32);
        assert_eq!(promoted(I16), I32);
        assert_eq!(promoted(U32), U32);
        assert_eq!(common_kind(U16, U16), I32);
        assert_eq!(common_kind(U8, I8), I32);
    }

    #[test]
    fn mixed_signedness() {
        assert_eq!(common_kind(U32, I32), U32);
        assert_eq!(common_kind(U32, I64), I64);
        assert_eq!(common_kind(U64, I8), U64);
        assert_eq!(common_kind(U16, I64), I64);
    }

    #[test]
    fn floats_win() {
        assert_eq!(common_kind(U64, F32), F32);
        assert_eq!(common_kind(F32, F64), F64);
        assert_eq!(common_kind(I8, F64), F64);
    }

    fn kind() -> impl Strategy<Value = ScalarKind> {
        proptest::sample::select(ScalarKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn symmetric(a in kind(), b in kind()) {
            prop_assert_eq!(common_kind(a, b), common_kind(b, a));
        }

        #[test]
        fn never_narrower_than_promoted(a in kind(), b in kind()) {
            // Floats win regardless of width.
            prop_assume!(a.is_integral() && b.is_integral());
            let common = common_kind(a, b);
            prop_assert!(common.size() >= promoted(a).size());
            prop_assert!(common.size() >= promoted(b).size());
        }
    }
}
