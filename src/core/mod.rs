// src/core/mod.rs

pub mod classify;
pub mod html;
pub mod net;
pub mod sanitize;
