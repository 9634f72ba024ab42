use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use entity::prelude::*;
use portal::{ActivityLogger, Portal, PortalError, Services};
use repository::Repository;
use serde::Deserialize;
use storage::{S3BlobStore, StorageConfig};
use submission::{stage_files, Draft, SubmissionPipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "magazine", about = "Browse and publish magazine posts")]
struct Cli {
    #[arg(long, default_value = "Config.toml")]
    config: String,

    #[arg(long, default_value = "Secrets.toml")]
    secrets: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts, optionally narrowed by a hashtag and a search query
    List {
        #[arg(long, default_value = "")]
        query: String,

        #[arg(long)]
        tag: Option<String>,
    },
    /// Upload local images and publish them as a new post
    Submit {
        #[arg(long)]
        title: String,

        #[arg(long)]
        category: CategoryEntity,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "hashtag")]
        hashtags: Vec<String>,

        /// PATH or PATH=URL, in display order. Only an `=` followed by a
        /// URL scheme starts the link, so paths may contain `=`
        #[arg(long = "image", required = true)]
        images: Vec<ImageArg>,
    },
    /// Allow a user to publish posts
    GrantAdmin { uid: String },
}

#[derive(Clone, Debug)]
struct ImageArg {
    path: PathBuf,
    link: Option<String>,
}

impl FromStr for ImageArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .match_indices('=')
            .map(|(at, _)| at)
            .find(|&at| has_url_scheme(&s[at + 1..]));
        let (path, link) = match split {
            Some(at) => (&s[..at], Some(s[at + 1..].to_string())),
            None => (s, None),
        };
        if path.is_empty() {
            return Err(format!("missing image path in {:?}", s));
        }

        Ok(Self {
            path: PathBuf::from(path),
            link,
        })
    }
}

fn has_url_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();

    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[derive(Debug, Deserialize)]
struct Config {
    storage: StorageSection,
    #[serde(default)]
    activity: ActivitySection,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    public_url: String,
    #[serde(default = "default_region")]
    region: String,
    #[serde(default = "default_prefix")]
    prefix: String,
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_prefix() -> String {
    submission::DEFAULT_PREFIX.to_string()
}

#[derive(Debug, Deserialize)]
struct ActivitySection {
    capacity: usize,
}

impl Default for ActivitySection {
    fn default() -> Self {
        Self {
            capacity: portal::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Secrets {
    database_url: String,
    aws_access_key_id: String,
    aws_secret_access_key: String,
    aws_url: String,
    bucket: String,
    user_uid: String,
    user_email: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config: Config = util::load_config(&cli.config)?;
    let secrets: Secrets = util::load_config(&cli.secrets)?;

    let repository = Repository::new(&secrets.database_url)
        .await
        .context("failed to init repository")?;

    if let Command::GrantAdmin { uid } = &cli.command {
        repository.admin.grant(uid).await?;
        info!(task = "grant admin", uid = %uid);
        return Ok(());
    }

    let blobs = S3BlobStore::connect(
        StorageConfig {
            bucket: secrets.bucket.clone(),
            endpoint_url: secrets.aws_url.clone(),
            public_url: config.storage.public_url.clone(),
            region: config.storage.region.clone(),
        },
        &secrets.aws_access_key_id,
        &secrets.aws_secret_access_key,
    )
    .await;

    let (activity, writer) = ActivityLogger::spawn(
        Arc::new(repository.activity.clone()),
        config.activity.capacity,
    );
    let posts = Arc::new(repository.post.clone());
    let services = Services {
        posts: posts.clone(),
        admins: Arc::new(repository.admin.clone()),
        activity,
        pipeline: SubmissionPipeline::new(Arc::new(blobs), posts)
            .with_prefix(config.storage.prefix.clone()),
    };

    let user = UserEntity {
        uid: secrets.user_uid.clone(),
        email: secrets.user_email.clone(),
        ..Default::default()
    };
    let mut portal = Portal::load(user, services).await?;

    let result = run(&mut portal, cli.command).await;

    drop(portal);
    writer.await.context("activity writer stopped")?;

    result
}

async fn run(portal: &mut Portal, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { query, tag } => {
            if let Some(tag) = tag {
                portal.select_tag(&tag);
            }
            portal.search(&query);

            for post in portal.visible() {
                print_post(&post);
            }
        }
        Command::Submit {
            title,
            category,
            description,
            hashtags,
            images,
        } => {
            let draft = build_draft(title, category, description, hashtags, &images)
                .await?;

            match portal.submit(draft).await {
                Ok(id) => println!("published {}", id),
                Err(PortalError::Submission(e)) if e.is_user_correctable() => {
                    if let submission::SubmissionError::Validation(v) = &e {
                        eprintln!("{}", v.user_message());
                    }
                    bail!(e);
                }
                Err(e) => bail!(e),
            }
        }
        Command::GrantAdmin { .. } => {}
    }

    Ok(())
}

async fn build_draft(
    title: String,
    category: CategoryEntity,
    description: Option<String>,
    hashtags: Vec<String>,
    images: &[ImageArg],
) -> anyhow::Result<Draft> {
    let paths: Vec<PathBuf> = images.iter().map(|i| i.path.clone()).collect();
    let staged = stage_files(&paths)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .context("failed to stage images")?;

    let draft = hashtags
        .into_iter()
        .fold(Draft::new(), |draft, tag| {
            draft.with_hashtag_input(tag).commit_hashtag()
        })
        .with_title(title)
        .with_description(description.unwrap_or_default())
        .with_category(category)
        .stage(staged);

    let draft = images.iter().enumerate().fold(draft, |draft, (index, image)| {
        match &image.link {
            Some(link) => draft.with_image_link(index, link),
            None => draft,
        }
    });

    Ok(draft)
}

fn print_post(post: &PostEntity) {
    let tags = post
        .hashtags
        .iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ");
    let thumbnail = post.thumbnail().map(|i| i.url.as_str()).unwrap_or("-");

    println!(
        "{}\t{}\t[{}]\t{}\t{}",
        post.id, post.title, post.category, tags, thumbnail
    );
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_image_arg_with_link() {
        let arg = ImageArg::from_str("cover.png=https://shop.example/a=b")
            .unwrap();

        assert_eq!(arg.path, PathBuf::from("cover.png"));
        assert_eq!(arg.link.as_deref(), Some("https://shop.example/a=b"));
    }

    #[test]
    fn test_image_arg_without_link() {
        let arg = ImageArg::from_str("shots/1.jpg").unwrap();

        assert_eq!(arg.path, PathBuf::from("shots/1.jpg"));
        assert_eq!(arg.link, None);
    }

    #[test]
    fn test_image_arg_path_may_contain_equals() {
        let plain = ImageArg::from_str("shots/w=800.png").unwrap();
        let linked =
            ImageArg::from_str("shots/w=800.png=https://shop.example").unwrap();

        assert_eq!(plain.path, PathBuf::from("shots/w=800.png"));
        assert_eq!(plain.link, None);
        assert_eq!(linked.path, PathBuf::from("shots/w=800.png"));
        assert_eq!(linked.link.as_deref(), Some("https://shop.example"));
    }

    #[test]
    fn test_config_file_parses() {
        let config: Config = util::load_from(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")),
            "Config.toml",
        )
        .unwrap();

        assert_eq!(config.storage.public_url, "https://images.example.com");
        assert_eq!(config.storage.region, "auto");
        assert_eq!(config.storage.prefix, "posts");
        assert_eq!(config.activity.capacity, 100);
    }

    #[test]
    fn test_image_arg_requires_path() {
        assert!(ImageArg::from_str("=https://x").is_err());
    }

    #[test]
    fn test_cli_parses_submit() {
        // Act
        let cli = Cli::try_parse_from([
            "magazine",
            "submit",
            "--title",
            "Welcome",
            "--category",
            "board-game",
            "--hashtag",
            "jazz",
            "--image",
            "a.png",
            "--image",
            "b.png=https://shop.example",
        ])
        .unwrap();

        // Assert
        let Command::Submit {
            category, images, ..
        } = cli.command
        else {
            panic!("expected submit");
        };
        assert_eq!(category, CategoryEntity::BoardGame);
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].link.as_deref(), Some("https://shop.example"));
    }
}
