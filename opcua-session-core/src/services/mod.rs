//! Service handlers invoked by the dispatcher once a request's session
//! binding has been validated. Each handler is a plain function over the
//! collaborator traits plus whatever per-session state it needs (the
//! continuation-point registry for Browse/BrowseNext); none of them touch
//! the session or channel registries themselves.

mod browse;
mod read_write;
mod register_nodes;
mod translate_browse_paths;

pub use browse::{handle_browse, handle_browse_next};
pub use read_write::{handle_read, handle_write};
pub use register_nodes::{
    handle_delete_subscriptions, handle_find_servers, handle_register_nodes,
    handle_unregister_nodes,
};
pub use translate_browse_paths::handle_translate_browse_paths;
