use rocket_okapi::rapidoc::{GeneralConfig, HideShowConfig, RapiDocConfig};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::swagger_ui::SwaggerUIConfig;

const OPENAPI_URL: &str = "/api/openapi.json";

pub fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: OPENAPI_URL.to_string(),
        ..Default::default()
    }
}

pub fn rapidoc() -> RapiDocConfig {
    RapiDocConfig {
        title: Some("Safari booking API".to_string()),
        general: GeneralConfig {
            spec_urls: vec![UrlObject::new("Safari booking", OPENAPI_URL)],
            ..Default::default()
        },
        hide_show: HideShowConfig {
            allow_spec_url_load: false,
            allow_spec_file_load: false,
            ..Default::default()
        },
        ..Default::default()
    }
}
