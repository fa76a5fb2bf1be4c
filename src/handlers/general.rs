use axum::{
    Json,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler — returns an HTML landing page with project info and links
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Payroll Engine API</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; min-height: 100vh; padding: 40px 20px; }
    .container { max-width: 720px; margin: 0 auto; }
    h1 { font-size: 2.4rem; font-weight: 800; background: linear-gradient(135deg, #3b82f6, #8b5cf6); -webkit-background-clip: text; -webkit-text-fill-color: transparent; margin-bottom: 8px; }
    p { color: #94a3b8; margin-bottom: 24px; }
    .card { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 20px; margin-bottom: 16px; }
    .card h3 { font-size: 1rem; color: #f1f5f9; margin-bottom: 6px; }
    .card a { color: #38bdf8; text-decoration: none; font-weight: 500; }
    .card a:hover { text-decoration: underline; }
  </style>
</head>
<body>
<div class="container">
  <h1>⚡ Payroll Engine API</h1>
  <p>Pay-period scheduling, payroll computation and leave-accrual ledgers with a draft → finalize lifecycle and statutory XML export.</p>
  <div class="card">
    <h3>📖 API Documentation</h3>
    <a href="/docs">Open Swagger UI →</a>
  </div>
  <div class="card">
    <h3>❤️ Health Check</h3>
    <a href="/health">GET /health →</a>
  </div>
</div>
</body>
</html>"#)
}

/// Liveness probe
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "payroll-engine",
    }))
}
