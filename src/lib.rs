pub mod storage;
pub mod sql;
pub mod catalog;
pub mod expression;
pub mod error;
pub mod planner;
