pub mod overview;
pub mod panels;
