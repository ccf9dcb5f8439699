pub mod due;
pub mod list;
pub mod reset;
pub mod review;
pub mod stats;
