/// Local macro to match variants.
/// Use as: `matchvar!(var, Backing::Inline(_))`
macro_rules! matchvar {
    ($ex: expr, $pat: pat) => {
        { if let $pat = $ex { true } else { false } }
    };
}
