//! Utils 模块

pub mod response;
