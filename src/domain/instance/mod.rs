// src/domain/instance/mod.rs
pub mod entity;

pub use entity::{Announcement, Image, Instance, Node};
