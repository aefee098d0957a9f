#![allow(dead_code)]

pub mod faulty_reader;
pub mod frames;
