// Per-resource endpoint methods on `ApiClient`.
//
// Each file adds inherent methods for one backend resource group. The
// methods only build paths and parameters; response handling is shared
// in `client.rs`.

mod config;
mod logs;
mod proxy;
mod rules;
mod scores;
mod system;
mod users;
