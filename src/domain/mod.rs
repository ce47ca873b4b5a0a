// Domain layer - plain data and rules, no I/O
pub mod capacity;
pub mod chart;
pub mod document;
pub mod event;
pub mod layout;
pub mod theme;
