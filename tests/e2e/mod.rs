pub mod execute;
pub mod export;
pub mod persistence;
pub mod tabs;
