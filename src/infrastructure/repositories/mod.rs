// src/infrastructure/repositories/mod.rs
mod kv_user;

pub use kv_user::KvUserRepository;
