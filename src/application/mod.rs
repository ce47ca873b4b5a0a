// Application layer - the dashlet framework and its use cases
pub mod chart;
pub mod dashlet;
pub mod dashlets;
pub mod host;
pub mod lifecycle;
pub mod preferences;
pub mod registry;
pub mod router;

#[cfg(test)]
pub mod testing;
