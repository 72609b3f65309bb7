pub mod html;
pub mod jwt;
pub mod mask;
pub mod rand;
