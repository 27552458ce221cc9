/// Build a `Vec<TaskArg>` from heterogeneous values.
///
/// Accepts anything convertible into a `TaskArg`: file references, raw
/// paths, path strings.
///
/// ```rust,ignore
/// let args = task_args![input_ref, "local/extra.dat"];
/// ```
#[macro_export]
macro_rules! task_args {
    () => {
        ::std::vec::Vec::new()
    };
    ($($arg: expr),+ $(,)*) => {
        vec![ $( $crate::TaskArg::from($arg) ),+ ]
    };
}
