use crate::auth::password;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub dsn: String,
    pub admin_email: String,
    pub admin_password: SecretString,
    pub admin_name: String,
}

struct DefaultService {
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    features: &'static [&'static str],
    sort_order: i32,
}

const DEFAULT_SERVICES: &[DefaultService] = &[
    DefaultService {
        title: "Web Development",
        description: "Custom web applications built with modern technologies. We create \
                      responsive, fast, and user-friendly websites that drive business growth.",
        icon: "Code",
        features: &[
            "Responsive Design",
            "Modern Frameworks",
            "E-commerce Solutions",
            "CMS Integration",
            "Performance Optimization",
        ],
        sort_order: 1,
    },
    DefaultService {
        title: "Mobile App Development",
        description: "Native and cross-platform mobile applications for iOS and Android, \
                      designed for performance and a polished user experience.",
        icon: "Smartphone",
        features: &[
            "iOS & Android",
            "Cross-Platform",
            "App Store Deployment",
            "Push Notifications",
        ],
        sort_order: 2,
    },
    DefaultService {
        title: "UI/UX Design",
        description: "User-centered interface and experience design, from wireframes to \
                      polished design systems that keep products consistent.",
        icon: "Palette",
        features: &[
            "Wireframing & Prototyping",
            "Design Systems",
            "Usability Testing",
        ],
        sort_order: 3,
    },
    DefaultService {
        title: "Cloud Solutions",
        description: "Deployment, scaling, and operations on modern cloud platforms, with \
                      infrastructure kept reproducible and observable.",
        icon: "Cloud",
        features: &["Cloud Migration", "CI/CD Pipelines", "Monitoring & Alerting"],
        sort_order: 4,
    },
];

/// Execute the seed action: upsert the initial admin account and insert the
/// default service catalog when the services table is empty.
///
/// # Errors
/// Returns an error if the database is unreachable or a statement fails.
pub async fn execute(args: Args) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&args.dsn)
        .await
        .context("Failed to connect to database")?;

    seed_admin(&pool, &args).await?;
    seed_services(&pool).await?;

    Ok(())
}

async fn seed_admin(pool: &PgPool, args: &Args) -> Result<()> {
    let password_hash = password::hash(args.admin_password.expose_secret())
        .context("failed to hash admin password")?;

    sqlx::query(
        r"
        INSERT INTO admins (email, password_hash, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email)
        DO UPDATE SET password_hash = EXCLUDED.password_hash, name = EXCLUDED.name
        ",
    )
    .bind(&args.admin_email)
    .bind(&password_hash)
    .bind(&args.admin_name)
    .execute(pool)
    .await
    .context("failed to upsert admin account")?;

    info!("Seeded admin account: {}", args.admin_email);

    Ok(())
}

async fn seed_services(pool: &PgPool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
        .fetch_one(pool)
        .await
        .context("failed to count services")?;

    if count > 0 {
        info!("Services already present, skipping default catalog");
        return Ok(());
    }

    for service in DEFAULT_SERVICES {
        let features: Vec<String> = service.features.iter().map(ToString::to_string).collect();
        sqlx::query(
            r"
            INSERT INTO services (title, description, icon, features, active, sort_order)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            ",
        )
        .bind(service.title)
        .bind(service.description)
        .bind(service.icon)
        .bind(&features)
        .bind(service.sort_order)
        .execute(pool)
        .await
        .with_context(|| format!("failed to insert default service: {}", service.title))?;
    }

    info!("Seeded {} default services", DEFAULT_SERVICES.len());

    Ok(())
}
