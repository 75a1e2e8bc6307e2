pub mod resume;

pub use resume::{
    Achievement, Certification, CustomSection, Education, Experience, Language, Project,
    Reference, Resume,
};
