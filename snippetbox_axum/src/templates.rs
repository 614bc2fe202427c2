use std::collections::HashMap;

use askama::Template;
use chrono::{DateTime, Utc};
use thiserror::Error;

use snippetbox::{Form, Snippet};

pub const HOME_PAGE: &str = "home.page.html";
pub const SHOW_PAGE: &str = "show.page.html";
pub const CREATE_PAGE: &str = "create.page.html";
pub const SIGNUP_PAGE: &str = "signup.page.html";
pub const LOGIN_PAGE: &str = "login.page.html";

/// Every page a handler renders.
pub const PAGES: [&str; 5] = [HOME_PAGE, SHOW_PAGE, CREATE_PAGE, SIGNUP_PAGE, LOGIN_PAGE];

/// View data for one render. Handlers fill the page fields; the render pipeline
/// fills `current_year`, `flash`, `csrf_token` and `is_authenticated`.
#[derive(Debug, Default)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: String,
    pub csrf_token: String,
    pub is_authenticated: bool,
    pub snippet: Option<SnippetView>,
    pub snippets: Vec<SnippetView>,
    pub form: Form,
}

/// A snippet with its dates already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: String,
    pub expires: String,
}

impl From<&Snippet> for SnippetView {
    fn from(snippet: &Snippet) -> Self {
        Self {
            id: snippet.id,
            title: snippet.title.clone(),
            content: snippet.content.clone(),
            created: human_date(Some(snippet.created)),
            expires: human_date(Some(snippet.expires)),
        }
    }
}

/// `02 Jan 2006 at 15:04` in UTC, or an empty string for no time.
pub fn human_date(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%d %b %Y at %H:%M").to_string())
        .unwrap_or_default()
}

#[derive(Template)]
#[template(path = "home.page.html")]
struct HomePage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "show.page.html")]
struct ShowPage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "create.page.html")]
struct CreatePage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "signup.page.html")]
struct SignupPage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "login.page.html")]
struct LoginPage<'a> {
    data: &'a TemplateData,
}

fn render_home(data: &TemplateData, buf: &mut String) -> askama::Result<()> {
    HomePage { data }.render_into(buf)
}

fn render_show(data: &TemplateData, buf: &mut String) -> askama::Result<()> {
    ShowPage { data }.render_into(buf)
}

fn render_create(data: &TemplateData, buf: &mut String) -> askama::Result<()> {
    CreatePage { data }.render_into(buf)
}

fn render_signup(data: &TemplateData, buf: &mut String) -> askama::Result<()> {
    SignupPage { data }.render_into(buf)
}

fn render_login(data: &TemplateData, buf: &mut String) -> askama::Result<()> {
    LoginPage { data }.render_into(buf)
}

/// Renders one page into a caller-owned buffer.
pub type PageRenderer = fn(&TemplateData, &mut String) -> askama::Result<()>;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("The template {0} does not exist")]
    MissingPage(String),
}

/// Page name to compiled template. Built once at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct TemplateCache {
    pages: HashMap<&'static str, PageRenderer>,
}

impl TemplateCache {
    /// All application pages. Layout and partials are compiled into each page.
    pub fn new() -> Self {
        Self::empty()
            .with_page(HOME_PAGE, render_home)
            .with_page(SHOW_PAGE, render_show)
            .with_page(CREATE_PAGE, render_create)
            .with_page(SIGNUP_PAGE, render_signup)
            .with_page(LOGIN_PAGE, render_login)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, name: &'static str, renderer: PageRenderer) -> Self {
        self.pages.insert(name, renderer);
        self
    }

    pub fn get(&self, name: &str) -> Option<PageRenderer> {
        self.pages.get(name).copied()
    }

    /// Fail unless every name in `names` is registered.
    pub fn ensure_pages(&self, names: &[&str]) -> Result<(), TemplateError> {
        match names.iter().find(|name| !self.pages.contains_key(**name)) {
            Some(missing) => Err(TemplateError::MissingPage(missing.to_string())),
            None => Ok(()),
        }
    }
}
