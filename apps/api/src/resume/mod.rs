pub mod form;
pub mod handlers;
pub mod normalize;
pub mod preview;
pub mod validation;
