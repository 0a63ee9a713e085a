// Compiles one of the crate's built-in grammar patterns.
macro_rules! regex(
    ($s:expr) => (::regex::Regex::new($s).expect("invalid built-in pattern"));
);
