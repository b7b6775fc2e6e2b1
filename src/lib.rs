use glam::Vec3;

pub type Color = Vec3;

pub mod config;
pub mod field;
pub mod img;
pub mod noise;
pub mod rt;
