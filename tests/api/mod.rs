mod harness;

mod courses;
mod lessons;
