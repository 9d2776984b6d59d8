mod controls;
mod fps;
mod panels;
mod tasks;

pub(super) use fps::FrameRate;
