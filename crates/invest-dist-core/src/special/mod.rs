pub mod normal;

pub use normal::{erf, normal_cdf, normal_inverse_cdf, normal_pdf};
