pub mod extract;
pub mod fill;
pub mod probe;

#[cfg(test)]
mod tests;
