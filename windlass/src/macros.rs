/// Builds a [`ToolArguments`](crate::ToolArguments) map from key/value pairs.
///
/// ```rust
/// use windlass::wl_args;
///
/// let args = wl_args! { "path" => "notes.txt", "limit" => 5 };
/// assert_eq!(args["path"], "notes.txt");
/// assert_eq!(args["limit"], 5);
/// ```
#[macro_export]
macro_rules! wl_args {
    () => {
        $crate::ToolArguments::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut arguments = $crate::ToolArguments::new();
        $(
            arguments.insert(::std::string::String::from($key), $crate::__private::serde_json::json!($value));
        )+
        arguments
    }};
}

/// Builds a single [`CallRequest`](crate::CallRequest).
///
/// ```rust
/// use windlass::wl_call;
///
/// let request = wl_call!("toolu_1" => "echo" { "message" => "hi" });
/// assert_eq!(request.name, "echo");
/// assert_eq!(request.arguments["message"], "hi");
/// ```
#[macro_export]
macro_rules! wl_call {
    ($id:expr => $name:tt { $($key:expr => $value:expr),* $(,)? }) => {
        $crate::CallRequest::new($id, $name, $crate::wl_args!($($key => $value),*))
    };
}

/// Builds an ordered `Vec<CallRequest>` batch.
///
/// ```rust
/// use windlass::wl_calls;
///
/// let batch = wl_calls![
///     "toolu_1" => "echo" { "message" => "hi" },
///     "toolu_2" => "ghost" {},
/// ];
///
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch[1].id, "toolu_2");
/// ```
#[macro_export]
macro_rules! wl_calls {
    () => {
        Vec::<$crate::CallRequest>::new()
    };
    ($($id:expr => $name:tt { $($key:expr => $value:expr),* $(,)? }),+ $(,)?) => {
        vec![$($crate::wl_call!($id => $name { $($key => $value),* })),+]
    };
}
