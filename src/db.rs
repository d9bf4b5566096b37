mod db_base;
mod db_structs;

pub use self::db_base::StructFileDb;
pub use self::db_structs::*;
