mod accounts_view;
mod countdown;

pub use self::accounts_view::*;
pub use self::countdown::*;
