#[macro_export]
macro_rules! impl_string_newtype {
    ($name:ty) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Monotonic handle newtype over `u64`; `0` is never issued.
#[macro_export]
macro_rules! impl_id_newtype {
    ($name:ty) => {
        impl $name {
            pub fn next(counter: &mut u64) -> Self {
                *counter += 1;
                Self(*counter)
            }
        }
    };
}
