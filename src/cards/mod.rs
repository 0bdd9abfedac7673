pub mod model;

pub use model::{
    Card,
    Category,
    Difficulty,
};
