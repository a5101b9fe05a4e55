//! Built-in handlers behind the synthetic `REDIRECT` and `STATIC` slots.

mod redirect;
mod static_files;

pub use redirect::RedirectTo;
#[cfg(feature = "fs")]
pub use static_files::FsAssets;
pub use static_files::{
    Asset, AssetSender, Served, StaticFiles, decode_path, normalize_path,
};
