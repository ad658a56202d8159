//! Picking the most relevant of several outcomes.

use crate::outcome::Outcome;

/// Returns whichever of `a` and `b` takes precedence.
///
/// 1. The higher `order` wins; a missing order counts as 0.
/// 2. On equal order a failure beats a success.
/// 3. Otherwise `b` is returned.
pub fn compare<'a, T>(a: &'a Outcome<T>, b: &'a Outcome<T>) -> &'a Outcome<T> {
    if first_wins(a, b) {
        a
    } else {
        b
    }
}

fn first_wins<T>(a: &Outcome<T>, b: &Outcome<T>) -> bool {
    let order_a = a.order().unwrap_or(0.0);
    let order_b = b.order().unwrap_or(0.0);

    if order_a != order_b {
        return order_a > order_b;
    }
    a.is_err() && b.is_ok()
}

/// Folds `outcomes` with [`compare`], e.g. to choose among parallel
/// fallbacks. Returns `None` for an empty input.
pub fn select<T, I>(outcomes: I) -> Option<Outcome<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    outcomes
        .into_iter()
        .reduce(|best, next| if first_wins(&best, &next) { best } else { next })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::outcome::{failure, failure_with, success, success_with};

    #[test]
    fn test_equal_order_prefers_failure() {
        let r1: Outcome<&str> = success("r1");
        let r2: Outcome<&str> = failure("e1");

        assert!(std::ptr::eq(compare(&r1, &r2), &r2));
        assert!(std::ptr::eq(compare(&r2, &r1), &r2));
    }

    #[test]
    fn test_same_tag_equal_order_returns_second() {
        let r3: Outcome<&str> = failure("a");
        let r4: Outcome<&str> = failure("b");
        assert!(std::ptr::eq(compare(&r3, &r4), &r4));

        let r5: Outcome<&str> = success("a");
        let r6: Outcome<&str> = success("b");
        assert!(std::ptr::eq(compare(&r5, &r6), &r6));
    }

    #[test]
    fn test_higher_order_wins() {
        let r1: Outcome<&str> = failure_with("", Options::new().order(1.0));
        let r2: Outcome<&str> = failure_with("", Options::new().order(2.0));

        assert!(std::ptr::eq(compare(&r1, &r2), &r2));
        assert!(std::ptr::eq(compare(&r2, &r1), &r2));

        let low_err: Outcome<&str> = failure("e");
        let high_ok: Outcome<&str> = success_with("ok", Options::new().order(1.0));
        assert!(std::ptr::eq(compare(&low_err, &high_ok), &high_ok));
    }

    #[test]
    fn test_skip_always_loses() {
        let skipped: Outcome<&str> = failure_with("e", Options::new().skip());
        let negative: Outcome<&str> = success_with("ok", Options::new().order(-1000.0));
        assert!(std::ptr::eq(compare(&skipped, &negative), &negative));
    }

    #[test]
    fn test_select() {
        let picked = select(vec![
            success_with("a", Options::new().order(1.0)),
            failure_with("b", Options::new().order(3.0)),
            success_with("c", Options::new().order(2.0)),
        ])
        .unwrap();
        assert!(picked.is_err_type("b"));

        assert!(select(Vec::<Outcome<u8>>::new()).is_none());
    }
}
