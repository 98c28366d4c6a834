use std::sync::LazyLock;

use garde::Validate;
use minijinja::AutoEscape;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Where the bundled Swagger UI distribution lives, relative to the routing path.
pub const WEBJAR_PATH: &str = "/webjars/swagger-ui";

static MULTIPLE_SLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new("/+").unwrap());

/// Collapses every run of `/` into a single separator.
pub fn normalize_path(path: &str) -> String {
    MULTIPLE_SLASHES.replace_all(path, "/").into_owned()
}

/// Values substituted into the Swagger UI page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct PageConfig {
    #[garde(skip)]
    pub title: String,
    #[garde(prefix("/"))]
    pub ui_path: String,
    #[garde(prefix("/"))]
    pub documentation_path: String,
    #[garde(length(min = 1))]
    pub swagger_version: String,
    /// `None` disables the remote schema validation badge.
    #[garde(skip)]
    pub validator_url: Option<String>,
    #[garde(prefix("/"))]
    pub routing_path: String,
    /// Prefix added by an outer proxy; never part of the server's own routes.
    #[garde(skip)]
    pub base_path: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            title: "OpenApi documentation".to_string(),
            ui_path: "/swagger".to_string(),
            documentation_path: "/openapi".to_string(),
            swagger_version: "5.17.14".to_string(),
            validator_url: Some("https://validator.swagger.io/validator".to_string()),
            routing_path: "/".to_string(),
            base_path: None,
        }
    }
}

impl PageConfig {
    fn root_path(&self) -> String {
        format!("{}{}", self.base_path.as_deref().unwrap_or_default(), self.routing_path)
    }

    /// Public URL of the Swagger UI assets, as seen by the browser.
    pub fn assets_path(&self) -> String {
        normalize_path(&format!("{}/{WEBJAR_PATH}/{}", self.root_path(), self.swagger_version))
    }

    /// Public URL of the documentation route, as seen by the browser.
    pub fn documentation_url(&self) -> String {
        normalize_path(&format!("{}{}", self.root_path(), self.documentation_path))
    }

    /// Route of `suffix` inside this server, i.e. without the base path.
    pub fn mount_path(&self, suffix: &str) -> String {
        normalize_path(&format!("{}{suffix}", self.routing_path))
    }
}

#[derive(Serialize)]
struct Document {
    name: String,
    url: String,
}

// language=html
const SWAGGER_UI_TEMPLATE: &str = indoc::indoc! {r##"
    <!-- HTML for static distribution bundle build -->
    <!DOCTYPE html>
    <html lang="en">
    <head>
      <meta charset="UTF-8">
      <title>{{ title }}</title>
      <link rel="stylesheet" type="text/css" href="{{ assets_path }}/swagger-ui.css" >
      <link rel="icon" type="image/png" href="{{ assets_path }}/favicon-32x32.png" sizes="32x32" />
      <style>
        html {
          box-sizing: border-box;
          overflow: -moz-scrollbars-vertical;
          overflow-y: scroll;
        }
        *, *:before, *:after {
          box-sizing: inherit;
        }
        body {
          margin:0;
          background: #fafafa;
        }
      </style>
    </head>
    <body>
    <div id="swagger-ui"></div>
    <script src="{{ assets_path }}/swagger-ui-bundle.js"> </script>
    <script src="{{ assets_path }}/swagger-ui-standalone-preset.js"> </script>
    <script>
      window.onload = function() {
        window.ui = SwaggerUIBundle({
          urls: [{% for doc in documents %}
            { name: '{{ doc.name }}', url: '{{ doc.url }}' }{% if not loop.last %},{% endif %}{% endfor %}{% if documents %}
          {% endif %}],
          dom_id: "#swagger-ui",
          deepLinking: true,
          presets: [
            SwaggerUIBundle.presets.apis,
            SwaggerUIStandalonePreset
          ],
          plugins: [
            SwaggerUIBundle.plugins.DownloadUrl
          ],
          layout: "StandaloneLayout",
          validatorUrl: {% if validator_url is none %}null{% else %}"{{ validator_url }}"{% endif %}
        })
      }
    </script>
    </body>
    </html>
"##};

/// Renders the Swagger UI bootstrap page.
///
/// Every value is substituted verbatim: the title and the versions are not
/// HTML-escaped, operators are trusted to configure safe text.
pub fn render_page<I, S>(config: &PageConfig, versions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let documentation_url = config.documentation_url();
    let documents: Vec<Document> = versions
        .into_iter()
        .map(|version| {
            let version = version.as_ref();
            Document {
                name: version.to_string(),
                url: format!("{documentation_url}?v={version}"),
            }
        })
        .collect();

    let mut env = minijinja::Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);

    env.render_str(
        SWAGGER_UI_TEMPLATE,
        minijinja::context! {
            title => &config.title,
            assets_path => config.assets_path(),
            documents,
            validator_url => &config.validator_url,
        },
    )
    .unwrap_or_else(|err| {
        tracing::error!(%err, "failed to render swagger ui page");
        String::new()
    })
}
