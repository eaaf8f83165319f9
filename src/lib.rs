pub mod analysis;
pub mod clean;
pub mod io;
pub mod plots;

#[cfg(test)]
mod tests;
