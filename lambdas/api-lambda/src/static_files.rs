use lambda_http::{http::StatusCode, Body, Error, Response};

/// A file of the browser client, compiled into the binary
#[derive(Debug, Clone, Copy)]
pub(crate) struct Asset {
    pub content_type: &'static str,
    pub contents: &'static str,
}

const INDEX_HTML: Asset = Asset {
    content_type: "text/html; charset=utf-8",
    contents: include_str!("../static/index.html"),
};

const APP_JS: Asset = Asset {
    content_type: "application/javascript; charset=utf-8",
    contents: include_str!("../static/js/app.js"),
};

const STYLE_CSS: Asset = Asset {
    content_type: "text/css; charset=utf-8",
    contents: include_str!("../static/css/style.css"),
};

pub(crate) fn lookup(path: &str) -> Option<Asset> {
    match path {
        "/" | "/index.html" => Some(INDEX_HTML),
        "/js/app.js" => Some(APP_JS),
        "/css/style.css" => Some(STYLE_CSS),
        _ => None,
    }
}

pub(crate) fn serve(asset: Asset) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", asset.content_type)
        .header("Cache-Control", "no-cache")
        .body(asset.contents.into())
        .map_err(Box::new)?)
}
