//! SIS API client: OAuth2 token exchange plus paginated roster and
//! stored-grade queries against the schema-table endpoints.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use gpa_calc::fetch::{BasicClient, PageQuery, auth::Bearer, fetch_all_pages};
use gpa_calc::grading::normalize::normalize_name;
use gpa_calc::grading::types::{CourseRecord, StudentName};

use crate::services::roster_api::{RosterApi, Student};

#[derive(Serialize)]
struct TokenRequest {
    grant_type: &'static str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct SisClient {
    base_url: Url,
    http: Bearer<BasicClient>,
    page_size: usize,
}

impl SisClient {
    /// Exchanges client credentials for an access token and returns a client
    /// that sends it as a bearer token on every request. One token covers
    /// the whole run.
    pub async fn connect(
        base_url: &str,
        client_id: &str,
        client_secret: &str,
        page_size: usize,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid SIS base URL {base_url}"))?;

        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let access_token =
            Self::exchange_token(&inner, &base_url, client_id, client_secret).await?;
        let http = Bearer::new(BasicClient::from_client(inner), &access_token)?;

        Ok(Self {
            base_url,
            http,
            page_size,
        })
    }

    async fn exchange_token(
        client: &reqwest::Client,
        base_url: &Url,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let response = client
            .post(base_url.join("oauth/access_token")?)
            .basic_auth(client_id, Some(client_secret))
            .form(&TokenRequest {
                grant_type: "client_credentials",
            })
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send token request: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Token exchange failed with status {status}: {body}"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse token response: {e}"))?;

        Ok(token.access_token)
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("ws/schema/table/{table}"))?)
    }
}

/// Reads a field that the API may serve as either a string or a number.
fn text_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn numeric_field(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl RosterApi for SisClient {
    async fn list_students(&self) -> Result<Vec<Student>> {
        let query = PageQuery {
            filter: None,
            projection: Some("student_number,first_name,last_name,grade_level".to_string()),
            page_size: self.page_size,
        };
        let records = fetch_all_pages(&self.http, &self.table_url("students")?, &query).await;

        let mut students = Vec::new();
        for record in records {
            let Some(id) = text_field(&record, "student_number").filter(|id| !id.is_empty())
            else {
                warn!(?record, "student record has no usable id, skipping");
                continue;
            };
            students.push(Student {
                id,
                first_name: normalize_name(
                    &text_field(&record, "first_name").unwrap_or_default(),
                ),
                last_name: normalize_name(
                    &text_field(&record, "last_name").unwrap_or_default(),
                ),
                grade_level: text_field(&record, "grade_level").unwrap_or_default(),
            });
        }
        Ok(students)
    }

    async fn student_grades(
        &self,
        student: &Student,
        term: Option<&str>,
    ) -> Result<Vec<CourseRecord>> {
        let filter = match term {
            Some(term) => format!("studentid=={};storecode=={term}", student.id),
            None => format!("studentid=={}", student.id),
        };
        let query = PageQuery {
            filter: Some(filter),
            projection: Some("grade,gradescale_name,earnedcrhrs".to_string()),
            page_size: self.page_size,
        };
        let records =
            fetch_all_pages(&self.http, &self.table_url("storedgrades")?, &query).await;

        Ok(records
            .into_iter()
            .map(|record| CourseRecord {
                student_id: student.id.clone(),
                name: StudentName::Split {
                    first: student.first_name.clone(),
                    last: student.last_name.clone(),
                },
                grade_level: student.grade_level.clone(),
                raw_grade: text_field(&record, "grade").unwrap_or_default(),
                scale: text_field(&record, "gradescale_name").unwrap_or_default(),
                credits: numeric_field(&record, "earnedcrhrs"),
                added_value: numeric_field(&record, "gradescale_name"),
            })
            .collect())
    }
}
