use axum::{response::Html, Json};
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "whatsapp-resume-extractor",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /
pub async fn home_handler() -> Html<&'static str> {
    Html(
        r#"<html>
    <head><title>WhatsApp Resume Extractor</title></head>
    <body style="font-family: Arial; text-align: center; padding: 50px;">
        <h1>WhatsApp Resume Extractor</h1>
        <p style="color: green; font-size: 20px;">System is running!</p>
        <hr>
        <p>Send resumes via WhatsApp to automatically extract and store data.</p>
    </body>
</html>"#,
    )
}
