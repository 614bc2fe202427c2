use reqwest::{Client, Response};

/// HTTP client that keeps cookies and never follows redirects.
pub struct MockBrowser {
    client: Client,
    base_url: String,
}

impl MockBrowser {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .unwrap();

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        let url = format!("{}{}", self.base_url, path);
        self.client.get(&url).send().await.unwrap()
    }

    pub async fn get_body(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form_data: &[(&str, &str)]) -> Response {
        let url = format!("{}{}", self.base_url, path);
        self.client.post(&url).form(form_data).send().await.unwrap()
    }

    /// Load `page` and return the CSRF token embedded in its form.
    pub async fn csrf_token(&self, page: &str) -> String {
        let body = self.get_body(page).await;
        extract_csrf_token(&body).unwrap_or_else(|| panic!("no CSRF token on {page}"))
    }

    /// Submit a form from `page` to `path` with the page's CSRF token attached.
    pub async fn submit(&self, page: &str, path: &str, fields: &[(&str, &str)]) -> Response {
        let token = self.csrf_token(page).await;
        let mut form_data = fields.to_vec();
        form_data.push(("csrf_token", token.as_str()));
        self.post_form(path, &form_data).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Response {
        self.submit(
            "/user/signup",
            "/user/signup",
            &[("name", name), ("email", email), ("password", password)],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.submit(
            "/user/login",
            "/user/login",
            &[("email", email), ("password", password)],
        )
        .await
    }
}

pub fn extract_csrf_token(body: &str) -> Option<String> {
    let marker = "name=\"csrf_token\" value=\"";
    let start = body.find(marker)? + marker.len();
    let end = body[start..].find('"')? + start;
    Some(body[start..end].to_string())
}

pub fn location(response: &Response) -> &str {
    response.headers()["location"].to_str().unwrap()
}
