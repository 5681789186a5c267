use crate::app::AppContext;
use crate::cli::LoginArgs;
use crate::helpers::prompt_email;
use crate::ui::{badge, print, receipt, Badge};

pub fn handle_login(ctx: &AppContext<'_>, args: &LoginArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false, None);
    let email = prompt_email(args.email.as_deref(), ui_ctx.is_interactive())?;

    let session = ctx.sessions()?.sign_in(&email)?;
    let Some(user) = session.user.as_ref() else {
        return Err(anyhow::anyhow!("Sign-in did not produce a user"));
    };

    if !ctx.quiet() {
        let admin = if session.is_admin(&ctx.config()?.admin_emails()) {
            "yes"
        } else {
            "no"
        };
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Signed in",
                &[
                    ("Name", user.name.as_str()),
                    ("Email", user.email.as_str()),
                    ("Admin", admin),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_logout(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let sessions = ctx.sessions()?;
    let was_signed_in = sessions.restore().is_signed_in();
    sessions.sign_out()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let message = if was_signed_in {
            "Signed out"
        } else {
            "Already signed out"
        };
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, message));
    }
    Ok(())
}
