use crate::app::AppContext;
use crate::cli::WhoamiArgs;
use crate::output::print_json;
use crate::ui::{hint, kv, print};

pub fn handle_whoami(ctx: &AppContext<'_>, args: &WhoamiArgs) -> anyhow::Result<()> {
    let session = ctx.sessions()?.restore();
    let admin = session.is_admin(&ctx.config()?.admin_emails());

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&serde_json::json!({
            "signedIn": session.is_signed_in(),
            "user": session.user,
            "admin": admin,
        }));
    }

    match session.user {
        Some(user) => {
            print(&ui_ctx, &kv(&ui_ctx, "Name", &user.name));
            print(&ui_ctx, &kv(&ui_ctx, "Email", &user.email));
            print(&ui_ctx, &kv(&ui_ctx, "Admin", if admin { "yes" } else { "no" }));
        }
        None => {
            print(&ui_ctx, &kv(&ui_ctx, "Status", "signed out"));
            if !ctx.quiet() {
                print(&ui_ctx, &hint(&ui_ctx, "Run `chemventory login <email>`."));
            }
        }
    }
    Ok(())
}
