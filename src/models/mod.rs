mod hit;

pub use hit::{Hit, HitField, NewHit, StringCount, DIRECT_REFERER};
