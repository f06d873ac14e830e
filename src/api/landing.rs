//! Landing page and dashboard
//!
//! Server-rendered HTML. The header shows a Login call-to-action when no
//! session email is present and an account menu otherwise.

use axum::{
    Router,
    extract::State,
    response::Html,
    routing::get,
};
use html_escape::{encode_double_quoted_attribute, encode_text};

use super::notify::LogoutOutcome;
use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser, SessionProfile};
use crate::config::SiteConfig;

/// Routes:
/// - GET / - Landing page
/// - GET /dashboard - Signed-in landing spot
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/dashboard", get(dashboard))
}

/// GET /
async fn landing(State(state): State<AppState>, MaybeUser(session): MaybeUser) -> Html<String> {
    let email = session.as_ref().map(|profile| profile.email.as_str());
    Html(render_landing_page(&state.config.site, email))
}

/// GET /dashboard
async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(profile): CurrentUser,
) -> Html<String> {
    Html(render_dashboard_page(&state.config.site, &profile))
}

const STYLES: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; color: #18181b; background: linear-gradient(135deg, #fff, #fafafa); }
header { position: fixed; top: 0; left: 0; width: 100%; z-index: 50; background: rgba(255,255,255,.7); backdrop-filter: blur(24px); border-bottom: 1px solid #e4e4e7; }
.bar { max-width: 80rem; margin: 0 auto; padding: 0 1.5rem; height: 4rem; display: flex; align-items: center; justify-content: space-between; }
.brand { font-size: 1.125rem; font-weight: 600; letter-spacing: -.01em; color: inherit; text-decoration: none; }
.brand span { color: #52525b; }
.cta { padding: .5rem 1.25rem; border-radius: 9999px; background: #000; color: #fff; font-size: .875rem; font-weight: 500; text-decoration: none; border: 0; cursor: pointer; }
.cta:hover { background: #27272a; }
.account { position: relative; }
.menu { position: absolute; right: 0; margin-top: .5rem; min-width: 12rem; background: #fff; border: 1px solid #e4e4e7; border-radius: .75rem; box-shadow: 0 10px 30px rgba(0,0,0,.08); padding: .5rem; }
.menu a, .menu button { display: block; width: 100%; text-align: left; padding: .5rem .75rem; border-radius: .5rem; background: none; border: 0; font: inherit; color: inherit; text-decoration: none; cursor: pointer; }
.menu a:hover, .menu button:hover { background: #f4f4f5; }
.menu .who { padding: .5rem .75rem; font-size: .75rem; color: #71717a; border-bottom: 1px solid #f4f4f5; margin-bottom: .25rem; }
main { max-width: 72rem; margin: 0 auto; padding: 8rem 1.5rem 4rem; }
h1 { font-size: 3rem; line-height: 1.1; letter-spacing: -.02em; margin: 0 0 1rem; }
.tagline { font-size: 1.125rem; color: #52525b; max-width: 40rem; }
.features { display: grid; grid-template-columns: repeat(auto-fit, minmax(15rem, 1fr)); gap: 1.5rem; margin-top: 4rem; padding: 0; list-style: none; }
.features li { padding: 1.5rem; border: 1px solid #e4e4e7; border-radius: 1rem; background: #fff; }
.features h3 { margin: 0 0 .5rem; font-size: 1rem; }
.features p { margin: 0; color: #52525b; font-size: .875rem; }
#toast { position: fixed; bottom: 1.5rem; right: 1.5rem; padding: .75rem 1rem; border-radius: .75rem; color: #fff; font-size: .875rem; }
#toast.success { background: #16a34a; }
#toast.error { background: #dc2626; }
"#;

/// Popup toggle, outside-click dismissal and the logout request.
///
/// `__ON_SUCCESS__`/`__ON_FAILURE__` are replaced with serialized `LogoutOutcome`s.
const ACCOUNT_MENU_SCRIPT: &str = r#"
(function () {
  var toggle = document.getElementById('account-toggle');
  var menu = document.getElementById('account-menu');
  var onSuccess = __ON_SUCCESS__;
  var onFailure = __ON_FAILURE__;

  function notify(notification) {
    var toast = document.getElementById('toast');
    toast.textContent = notification.message;
    toast.className = notification.kind;
    toast.hidden = false;
    setTimeout(function () { toast.hidden = true; }, 3000);
  }

  function settle(outcome) {
    notify(outcome.notification);
    if (outcome.redirect_to) { window.location.href = outcome.redirect_to; }
  }

  toggle.addEventListener('click', function (event) {
    event.stopPropagation();
    menu.hidden = !menu.hidden;
  });

  document.addEventListener('mousedown', function (event) {
    if (!menu.hidden && !menu.contains(event.target) && !toggle.contains(event.target)) {
      menu.hidden = true;
    }
  });

  document.getElementById('logout-button').addEventListener('click', function () {
    fetch('/api/auth/logout', { method: 'POST', credentials: 'same-origin' })
      .then(function (response) { settle(response.status === 200 ? onSuccess : onFailure); })
      .catch(function () { settle(onFailure); });
  });
})();
"#;

fn script_json(outcome: &LogoutOutcome) -> String {
    serde_json::to_string(outcome)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn render_account_menu(email: &str) -> String {
    use axum::http::StatusCode;

    let script = ACCOUNT_MENU_SCRIPT
        .replace(
            "__ON_SUCCESS__",
            &script_json(&LogoutOutcome::from_status(Some(StatusCode::OK))),
        )
        .replace("__ON_FAILURE__", &script_json(&LogoutOutcome::from_status(None)));

    format!(
        r#"<div class="account">
        <button id="account-toggle" class="cta" type="button" aria-haspopup="true">{email}</button>
        <div id="account-menu" class="menu" hidden>
          <div class="who">{email}</div>
          <a href="/dashboard">Dashboard</a>
          <button id="logout-button" type="button">Logout</button>
        </div>
      </div>
      <div id="toast" role="status" hidden></div>
      <script>{script}</script>"#,
        email = encode_text(email),
        script = script,
    )
}

fn render_header(site: &SiteConfig, email: Option<&str>) -> String {
    let affordance = match email {
        Some(email) => render_account_menu(email),
        None => r#"<a class="cta" href="/api/auth/login">Login</a>"#.to_string(),
    };

    format!(
        r#"<header>
    <div class="bar">
      <a class="brand" href="/">{brand}</a>
      {affordance}
    </div>
  </header>"#,
        brand = render_brand(&site.product_name),
    )
}

/// "SupportChat" renders as "Support<span>Chat</span>"
fn render_brand(product_name: &str) -> String {
    match product_name.strip_suffix("Chat") {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}<span>Chat</span>", encode_text(prefix))
        }
        _ => encode_text(product_name).into_owned(),
    }
}

fn render_document(site: &SiteConfig, title: &str, email: Option<&str>, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <style>{styles}</style>
</head>
<body>
  {header}
  <main>
{main}
  </main>
</body>
</html>
"#,
        title = encode_text(title),
        styles = STYLES,
        header = render_header(site, email),
    )
}

/// Render the landing page
///
/// `email` is the session-derived email; `None` or empty means signed out.
pub fn render_landing_page(site: &SiteConfig, email: Option<&str>) -> String {
    let email = email.filter(|email| !email.trim().is_empty());

    let features: String = site
        .features
        .iter()
        .map(|feature| {
            format!(
                "      <li><h3>{}</h3><p>{}</p></li>\n",
                encode_text(&feature.title),
                encode_text(&feature.description)
            )
        })
        .collect();

    let main = format!(
        r#"    <section class="hero">
      <h1>{headline}</h1>
      <p class="tagline">{tagline}</p>
    </section>
    <ul class="features">
{features}    </ul>"#,
        headline = encode_text(&site.headline),
        tagline = encode_text(&site.tagline),
    );

    render_document(site, &site.product_name, email, &main)
}

/// Render the dashboard for a signed-in user
pub fn render_dashboard_page(site: &SiteConfig, profile: &SessionProfile) -> String {
    let main = format!(
        r#"    <section class="hero">
      <h1>Welcome, {name}</h1>
      <p class="tagline">Signed in as <a href="mailto:{mailto}">{email}</a>.</p>
    </section>"#,
        name = encode_text(profile.display_name()),
        mailto = encode_double_quoted_attribute(&profile.email),
        email = encode_text(&profile.email),
    );

    let title = format!("Dashboard - {}", site.product_name);
    render_document(site, &title, Some(&profile.email), &main)
}
