use std::{path::PathBuf, sync::Arc};

mod prompt;
mod render;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    build_http_client,
    config::{load_settings, normalize_base_url},
    session::{describe_auth_failure, landing_route, RegisterForm},
    BookCatalogController, BookForm, CatalogApi, CatalogCommand, CatalogEvent, ConfirmPrompt,
    FetchState, HttpCatalogApi, ImageUpload, SessionClient, Submission,
};
use prompt::{AssumeYes, StdinConfirm};
use reqwest::Client;
use shared::{
    domain::{BookId, Genre, Role},
    navigation::nav_items_for_role,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "book-admin", about = "Manage the library's book catalog")]
struct Cli {
    /// Overrides the API base url from the config file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct BookChanges {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// Genre id or name.
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cover_url: Option<String>,
    /// Image file to upload as the new cover.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Genres,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Genre id or name.
        #[arg(long)]
        genre: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        cover_url: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Edit {
        id: String,
        #[command(flatten)]
        changes: BookChanges,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    Whoami,
    Nav {
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "user" => Ok(Role::User),
        "admin" => Ok(Role::Admin),
        "moderator" => Ok(Role::Moderator),
        other => Err(format!("unknown role '{other}' (expected user, admin or moderator)")),
    }
}

/// Accepts either a genre id or a genre name; unknown values pass through untouched.
fn resolve_genre(genres: &[Genre], raw: &str) -> String {
    let raw = raw.trim();
    genres
        .iter()
        .find(|genre| genre.id.as_str() == raw)
        .or_else(|| {
            genres
                .iter()
                .find(|genre| genre.name.eq_ignore_ascii_case(raw))
        })
        .map(|genre| genre.id.to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn apply_changes(form: &mut BookForm, changes: &BookChanges, genres: &[Genre]) {
    if let Some(title) = &changes.title {
        form.title = title.clone();
    }
    if let Some(author) = &changes.author {
        form.author = author.clone();
    }
    if let Some(genre) = &changes.genre {
        form.genre_id = resolve_genre(genres, genre);
    }
    if let Some(description) = &changes.description {
        form.description = description.clone();
    }
    if let Some(cover_url) = &changes.cover_url {
        form.cover_image_url = cover_url.clone();
    }
}

struct App {
    http: Client,
    base_url: String,
}

impl App {
    fn session(&self) -> SessionClient {
        SessionClient::with_client(self.http.clone(), self.base_url.clone())
    }

    async fn catalog(&self, confirm: Arc<dyn ConfirmPrompt>) -> BookCatalogController {
        let api = Arc::new(HttpCatalogApi::with_client(
            self.http.clone(),
            self.base_url.clone(),
        ));
        load_catalog(api, confirm).await
    }

    async fn submit(
        &self,
        controller: &mut BookCatalogController,
        form: BookForm,
        image: Option<PathBuf>,
    ) -> Result<()> {
        let payload = form.validate()?;
        let mut submission = Submission::new(payload);
        if let Some(path) = image {
            submission = submission.with_image(ImageUpload::from_path(path).await?);
        }
        report(controller.dispatch(CatalogCommand::Submit(submission)).await)?;
        println!("{}", render::books_table(&controller.rows()));
        Ok(())
    }
}

/// Builds a controller and runs the initial load. A failed fetch is logged and
/// leaves that collection empty; commands addressed by id still go through.
async fn load_catalog(
    api: Arc<dyn CatalogApi>,
    confirm: Arc<dyn ConfirmPrompt>,
) -> BookCatalogController {
    let mut controller = BookCatalogController::new(api, confirm);
    let event = controller.dispatch(CatalogCommand::Load).await;
    info!(status = %event.describe(), "catalog loaded");
    if let FetchState::Failure(reason) = controller.books_fetch() {
        warn!(%reason, "books unavailable; continuing with an empty list");
    }
    if let FetchState::Failure(reason) = controller.genres_fetch() {
        warn!(%reason, "genres unavailable; genre names will show as placeholders");
    }
    controller
}

/// Prints the event's status line, turning failures into errors.
fn report(event: CatalogEvent) -> Result<()> {
    match event {
        CatalogEvent::Failed(err) => Err(err.into()),
        other => {
            println!("{}", other.describe());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref());
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = api_url.clone();
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let app = App {
        http: build_http_client(settings.request_timeout())?,
        base_url: normalize_base_url(&settings.api_base_url)?,
    };

    match cli.command {
        Command::List => {
            let controller = app.catalog(Arc::new(StdinConfirm)).await;
            println!("{}", render::books_table(&controller.rows()));
        }
        Command::Genres => {
            let controller = app.catalog(Arc::new(StdinConfirm)).await;
            println!("{}", render::genres_table(controller.genres()));
        }
        Command::Add {
            title,
            author,
            genre,
            description,
            cover_url,
            image,
        } => {
            let mut controller = app.catalog(Arc::new(StdinConfirm)).await;
            report(controller.dispatch(CatalogCommand::OpenCreate).await)?;
            let form = BookForm {
                title,
                author,
                genre_id: resolve_genre(controller.genres(), &genre),
                description,
                cover_image_url: cover_url.unwrap_or_default(),
            };
            app.submit(&mut controller, form, image).await?;
        }
        Command::Edit { id, changes } => {
            let mut controller = app.catalog(Arc::new(StdinConfirm)).await;
            let book = controller
                .find_book(&BookId::new(id.as_str()))
                .cloned()
                .ok_or_else(|| anyhow!("no book with id '{id}'"))?;
            report(controller.dispatch(CatalogCommand::BeginEdit(book)).await)?;
            let mut form = controller.form().draft();
            apply_changes(&mut form, &changes, controller.genres());
            app.submit(&mut controller, form, changes.image).await?;
        }
        Command::Delete { id, yes } => {
            let confirm: Arc<dyn ConfirmPrompt> = if yes {
                Arc::new(AssumeYes)
            } else {
                Arc::new(StdinConfirm)
            };
            let mut controller = app.catalog(confirm).await;
            report(controller.dispatch(CatalogCommand::Delete(BookId::new(id))).await)?;
        }
        Command::Login { email, password } => {
            let session = app.session();
            let response = session
                .login(&email, &password)
                .await
                .map_err(|err| anyhow!(describe_auth_failure(&err.to_string())))?;
            if !response.success {
                bail!(describe_auth_failure(&response.message));
            }
            println!("{}", response.message);
            let user = session.present_user().await?;
            println!("next: {}", landing_route(user.as_ref()));
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
            photo,
        } => {
            let photo = match photo {
                Some(path) => Some(ImageUpload::from_path(path).await?),
                None => None,
            };
            let response = app
                .session()
                .register(RegisterForm {
                    name,
                    email,
                    password,
                    confirm_password,
                    photo,
                })
                .await?;
            if !response.success {
                bail!("registration rejected: {}", response.message);
            }
            println!("{}", response.message);
        }
        Command::Whoami => {
            let user = app.session().present_user().await?;
            match &user {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("not signed in"),
            }
            println!("landing: {}", landing_route(user.as_ref()));
        }
        Command::Nav { role } => {
            println!("{}", render::nav_table(&nav_items_for_role(role)));
        }
    }

    Ok(())
}
