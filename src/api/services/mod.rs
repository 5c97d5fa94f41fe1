pub mod error_code;
pub mod helpers;
pub mod invites;
pub mod links;
pub mod redirect;
pub mod types;

pub use error_code::ErrorCode;
pub use invites::{invite_item, invites_collection};
pub use links::{link_item, links_collection};
pub use redirect::{RedirectService, redirect_routes};

use actix_web::web;

/// All routes. `/links` and the invite routes must be registered before the
/// `/{symbol}` catch-all.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(helpers::json_config())
        .service(links_collection("/links"))
        .service(links_collection("/links/"))
        .service(link_item())
        .service(invites_collection("/invites"))
        .service(invites_collection("/invites/"))
        .service(invite_item());
    redirect_routes(cfg);
}
