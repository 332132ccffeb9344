//! 本地Web UI
//!
//! 单页查询入口 + SSE进度流。页面提交查询后通过`/api/research`逐条
//! 接收流水线的进度更新与最终报告。

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State},
    response::{
        Html,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use tokio_stream::StreamExt;

use crate::agent::{AgentContext, ResearchPipeline};
use crate::config::Config;

/// 应用共享状态
#[derive(Clone)]
struct AppState {
    pipeline: ResearchPipeline,
}

#[derive(Debug, Deserialize)]
struct ResearchParams {
    q: String,
}

/// 启动Web服务
pub async fn serve(config: &Config) -> Result<()> {
    let context = AgentContext::new(config.clone())?;

    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    let pipeline = ResearchPipeline::new(context)?;
    let app = Router::new()
        .route("/", get(index))
        .route("/api/research", get(research_stream))
        .with_state(AppState { pipeline });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    println!("🚀 DeepScholar Web UI已启动: http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// SSE研究进度流
///
/// 每条事件携带一个JSON编码的`PipelineUpdate`，`final`事件之后流结束。
async fn research_stream(
    State(state): State<AppState>,
    Query(params): Query<ResearchParams>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state.pipeline.process_query(params.q).map(|update| {
        let name = if update.is_final { "final" } else { "progress" };
        Event::default().event(name).json_data(&update)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>DeepScholar Research Agent</title>
<style>
  body { font-family: -apple-system, "Segoe UI", sans-serif; margin: 0; background: #f5f6f8; color: #1d2129; }
  header { padding: 1.2rem 2rem; background: #ffffff; border-bottom: 1px solid #e3e6ea; }
  header h1 { margin: 0; font-size: 1.3rem; }
  header p { margin: 0.3rem 0 0; color: #5f6672; font-size: 0.9rem; }
  main { display: flex; gap: 1rem; padding: 1rem 2rem; }
  .panel { background: #ffffff; border: 1px solid #e3e6ea; border-radius: 8px; padding: 1rem; overflow-y: auto; height: 70vh; }
  #response { flex: 3; white-space: pre-wrap; }
  #steps { flex: 2; white-space: pre-wrap; font-size: 0.85rem; }
  form { display: flex; gap: 0.6rem; padding: 1rem 2rem 0; }
  input[type=text] { flex: 1; padding: 0.6rem 0.8rem; border: 1px solid #cfd4da; border-radius: 6px; font-size: 1rem; }
  button { padding: 0.6rem 1.4rem; border: none; border-radius: 6px; background: #2563eb; color: white; font-size: 1rem; cursor: pointer; }
  button:disabled { background: #9db4e8; cursor: wait; }
</style>
</head>
<body>
<header>
  <h1>🔬 DeepScholar Research Agent</h1>
  <p>Enter your research question and watch the agent search, extract and analyze research papers.</p>
</header>
<form id="form">
  <input type="text" id="query" placeholder="e.g. 'latest developments in large language models'" autocomplete="off">
  <button type="submit" id="submit">🔍 Start Research</button>
</form>
<main>
  <div class="panel" id="response">🎯 Ready to start research!</div>
  <div class="panel" id="steps">📋 Agent steps will appear here...</div>
</main>
<script>
  const form = document.getElementById('form');
  const responsePanel = document.getElementById('response');
  const stepsPanel = document.getElementById('steps');
  const submit = document.getElementById('submit');
  let source = null;

  form.addEventListener('submit', (e) => {
    e.preventDefault();
    const query = document.getElementById('query').value.trim();
    if (!query) return;
    if (source) source.close();

    submit.disabled = true;
    responsePanel.textContent = '…';
    source = new EventSource('/api/research?q=' + encodeURIComponent(query));

    const render = (raw) => {
      const update = JSON.parse(raw);
      responsePanel.textContent = update.message;
      stepsPanel.textContent = update.step_board;
    };
    source.addEventListener('progress', (ev) => render(ev.data));
    source.addEventListener('final', (ev) => {
      render(ev.data);
      submit.disabled = false;
      source.close();
    });
    source.onerror = () => {
      submit.disabled = false;
      source.close();
    };
  });
</script>
</body>
</html>
"##;
