use axum::response::Html;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome page HTML", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn root() -> Html<&'static str> {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Content Tracker</title>
    <style>
        body { margin: 0; font-family: system-ui, sans-serif; background: #f6f7f9; color: #1f2933; }
        main { max-width: 40rem; margin: 12vh auto; padding: 0 1.5rem; }
        h1 { margin-bottom: 0.25rem; }
        ol { padding-left: 1.25rem; line-height: 1.8; }
        code { background: #e4e7eb; padding: 0.1rem 0.35rem; border-radius: 4px; }
        a { color: #2563eb; }
    </style>
</head>
<body>
    <main>
        <h1>Content Tracker</h1>
        <p>Projects move through review before they go live:</p>
        <ol>
            <li>Draft</li>
            <li>Editor Review</li>
            <li>Client Review</li>
            <li>Approved</li>
            <li>Final Delivered</li>
        </ol>
        <p>Either review stage can send a project to <code>needs_revision</code>.</p>
        <p><a href="/swagger-ui">API documentation</a> &middot; <a href="/health">Health</a></p>
    </main>
</body>
</html>
"#)
}
