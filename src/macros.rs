#[macro_export]
macro_rules! value {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    // Handle true
    (true) => {
        $crate::Value::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Bool(false)
    };

    // Handle empty sequence
    ([]) => {
        $crate::Value::Sequence(vec![])
    };

    // Handle non-empty sequence
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence(vec![$($crate::value!($elem)),*])
    };

    // Handle empty mapping
    ({}) => {
        $crate::Value::Mapping($crate::ValueMap::new())
    };

    // Handle non-empty mapping
    ({ $($key:literal : $val:tt),* $(,)? }) => {{
        let mut map = $crate::ValueMap::new();
        $(
            map.insert($key.to_string(), $crate::value!($val));
        )*
        $crate::Value::Mapping(map)
    }};

    // Fallback for any expression with a From conversion
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
