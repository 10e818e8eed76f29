//! `preq send <method> <url>` – send a request through the queue interceptor.

use anyhow::{Context, Result};
use preq_core::client::{
    ClientRequest, CurlTransport, FilePart, FormData, HttpClient, Method, RequestBody,
};
use preq_core::interceptor::{mount_interceptor, unmount_interceptor};
use preq_core::manager::{ManagerRegistry, QueueSettings, SharedManager};
use std::sync::Arc;

use crate::cli::SendArgs;

pub async fn run_send(
    manager: SharedManager,
    registry: &mut ManagerRegistry,
    settings: &QueueSettings,
    args: &SendArgs,
) -> Result<()> {
    let mut client = HttpClient::new(
        settings.client_defaults.clone(),
        Arc::new(CurlTransport::default()),
    );
    let request = build_request(&client, args)?;

    let handles = mount_interceptor(&mut client, manager);
    let outcome = client.request(request).await;
    unmount_interceptor(&mut client, handles, registry);

    match outcome {
        Ok(response) => {
            println!("{} {}", response.status, args.url);
            if !response.body.is_empty() {
                println!("{}", String::from_utf8_lossy(&response.body));
            }
            Ok(())
        }
        Err(err) => Err(err).context("request failed; it stays queued (see `preq list`)"),
    }
}

pub(crate) fn build_request(client: &HttpClient, args: &SendArgs) -> Result<ClientRequest> {
    let method: Method = args.method.parse()?;
    let mut request = client.build(method, args.url.clone());
    for (name, value) in &args.headers {
        request = request.with_header(name.clone(), value.clone());
    }

    if let Some(json) = &args.json {
        let value = serde_json::from_str(json).context("--json is not valid JSON")?;
        request = request.with_data(RequestBody::Json(value));
    } else if let Some(data) = &args.data {
        request = request.with_data(RequestBody::Text(data.clone()));
    } else if !args.form.is_empty() || !args.file.is_empty() {
        let mut form = FormData::new();
        for (name, value) in &args.form {
            form.append_text(name.clone(), value.clone());
        }
        for (name, path) in &args.file {
            form.append_file(name.clone(), FilePart::from_path(path));
        }
        request = request.with_data(RequestBody::Form(form));
    }
    Ok(request)
}
