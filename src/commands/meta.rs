use anyhow::Result;

use super::config::Config;
use super::source::PageSource;
use crate::{extract::extract_metadata, runtime::Runtime};

/// Print page metadata and, for fetched pages, the cookies the session holds.
#[tracing::instrument(skip(config))]
pub async fn meta<R: Runtime>(config: &mut Config<R>, source: &PageSource) -> Result<()> {
    let page = config.load_page(source).await?;
    let metadata = extract_metadata(&page.document())?;

    println!("Page Metadata:");
    for (label, value) in metadata.fields() {
        println!("  {}: {}", label, value);
    }

    if matches!(source, PageSource::Url(_)) {
        let cookies = config.session.cookies(&page.base);
        println!("Cookies received: {}", cookies.len());
        for (name, _) in &cookies {
            println!("  {}", name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::config::FetchOptions;
    use crate::runtime::RealRuntime;
    use std::time::Duration;

    #[tokio::test]
    async fn test_meta_from_url_stores_cookies() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("set-cookie", "visit=1; Path=/")
            .with_body(r#"<title>Meta</title><meta name="author" content="Me">"#)
            .create_async()
            .await;

        let options = FetchOptions {
            delay: Duration::ZERO,
            ..FetchOptions::default()
        };
        let mut config = Config::new(RealRuntime, &options).unwrap();
        let url = format!("{}/", server.url());
        meta(&mut config, &PageSource::Url(url.clone())).await.unwrap();

        mock.assert_async().await;
        let cookies = config.session.cookies(&url::Url::parse(&url).unwrap());
        assert_eq!(cookies.len(), 1);
    }
}
