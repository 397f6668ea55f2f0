mod client;
mod error;
mod models;
mod resource;

pub use error::ApiError;
pub use resource::*;

use anyhow::Result;
use chrono::NaiveDate;
use client::Client;
use log::*;
use models::{ActionStatusModel, ClientModel, DataModel, PageModel, ProspectModel, StatusModel};
use reqwest::Method;

/// Query inputs for the paginated prospect list endpoint.
///
#[derive(Clone, Debug)]
pub struct ProspectQuery {
    pub page: usize,
    pub status: Option<ProspectStatus>,
    pub action_state: Option<ActionStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort_field: Option<&'static str>,
    pub sort_descending: bool,
}

impl ProspectQuery {
    /// Returns an unfiltered query for the given page.
    ///
    pub fn new(page: usize) -> ProspectQuery {
        ProspectQuery {
            page,
            status: None,
            action_state: None,
            date_from: None,
            date_to: None,
            search: None,
            sort_field: None,
            sort_descending: false,
        }
    }

    /// Serializes the query into backend query parameters.
    ///
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(status) = self.status {
            params.push(("statusFilter", status.as_param().to_string()));
        }
        if let Some(action_state) = self.action_state {
            params.push(("actionStateFilter", action_state.as_param().to_string()));
        }
        if let Some(date_from) = self.date_from {
            params.push(("dateRangeStart", date_from.format("%Y-%m-%d").to_string()));
        }
        if let Some(date_to) = self.date_to {
            params.push(("dateRangeEnd", date_to.format("%Y-%m-%d").to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("searchTerm", search.clone()));
        }
        if let Some(sort_field) = self.sort_field {
            params.push(("sortField", sort_field.to_string()));
            let direction = if self.sort_descending { "desc" } else { "asc" };
            params.push(("sortDirection", direction.to_string()));
        }
        params
    }
}

/// Query inputs for the paginated client list endpoint.
///
#[derive(Clone, Debug)]
pub struct ClientQuery {
    pub page: usize,
    pub search: Option<String>,
}

impl ClientQuery {
    /// Returns an unfiltered query for the given page.
    ///
    pub fn new(page: usize) -> ClientQuery {
        ClientQuery { page, search: None }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(search) = &self.search {
            params.push(("searchTerm", search.clone()));
        }
        params
    }
}

/// Field updates submitted from the prospect edit form.
///
#[derive(Clone, Debug, Default)]
pub struct ProspectUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<ProspectStatus>,
}

impl ProspectUpdate {
    /// Serializes only the fields being changed.
    ///
    fn body(&self) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        if let Some(name) = &self.name {
            data.insert("name".to_string(), name.clone().into());
        }
        if let Some(email) = &self.email {
            data.insert("email".to_string(), email.clone().into());
        }
        if let Some(phone) = &self.phone {
            data.insert("phone".to_string(), phone.clone().into());
        }
        if let Some(company) = &self.company {
            data.insert("company".to_string(), company.clone().into());
        }
        if let Some(status) = self.status {
            data.insert("status".to_string(), status.as_param().into());
        }
        serde_json::json!({ "data": data })
    }
}

/// Responsible for asynchronous interaction with the Leadline REST API
/// including transformation of response data into explicitly-defined types.
///
pub struct Crm {
    client: Client,
}

impl Crm {
    /// Returns a new instance for the given access token and base URL.
    ///
    pub fn new(access_token: &str, base_url: &str) -> Crm {
        debug!("Initializing Leadline API client against {}...", base_url);
        Crm {
            client: Client::new(access_token, base_url),
        }
    }

    /// Returns one page of prospects matching the query.
    ///
    pub async fn prospects(&self, query: &ProspectQuery) -> Result<Page<Prospect>> {
        debug!("Requesting prospects page {}...", query.page);
        let model: PageModel<ProspectModel> =
            self.client.get_json("prospects", &query.params()).await?;
        debug!(
            "Retrieved {} prospects (page {} of {})",
            model.items.len(),
            model.current_page,
            model.last_page
        );
        Ok(Page {
            meta: page_meta(&model),
            items: model.items.into_iter().map(map_prospect).collect(),
        })
    }

    /// Returns one page of clients matching the query.
    ///
    pub async fn clients(&self, query: &ClientQuery) -> Result<Page<ClientRecord>> {
        debug!("Requesting clients page {}...", query.page);
        let model: PageModel<ClientModel> =
            self.client.get_json("clients", &query.params()).await?;
        debug!(
            "Retrieved {} clients (page {} of {})",
            model.items.len(),
            model.current_page,
            model.last_page
        );
        Ok(Page {
            meta: page_meta(&model),
            items: model.items.into_iter().map(map_client).collect(),
        })
    }

    /// Returns full details for a single prospect.
    ///
    pub async fn prospect(&self, id: i64) -> Result<Prospect> {
        debug!("Requesting prospect {}...", id);
        let path = format!("prospects/{}", id);
        let response = self.client.call(Method::GET, &path, &[], None).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::ProspectNotFound { id }.into());
        }
        let model: DataModel<ProspectModel> = Client::parse(response).await?;
        Ok(map_prospect(model.data))
    }

    /// Applies field updates to a prospect and returns the updated record.
    ///
    pub async fn update_prospect(&self, id: i64, update: &ProspectUpdate) -> Result<Prospect> {
        debug!("Updating prospect {}...", id);
        let path = format!("prospects/{}", id);
        let model: DataModel<ProspectModel> = self
            .client
            .send_json(Method::PUT, &path, update.body())
            .await?;
        Ok(map_prospect(model.data))
    }

    /// Deletes a prospect.
    ///
    pub async fn delete_prospect(&self, id: i64) -> Result<()> {
        debug!("Deleting prospect {}...", id);
        let path = format!("prospects/{}", id);
        let response = self.client.call(Method::DELETE, &path, &[], None).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::ProspectNotFound { id }.into());
        }
        if !status.is_success() {
            let message = Client::error_message(response).await;
            error!("Failed to delete prospect {}: {}", id, message);
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        Ok(())
    }
}

fn page_meta<T>(model: &PageModel<T>) -> PageMeta {
    PageMeta {
        current_page: model.current_page,
        last_page: model.last_page,
        total_items: model.total_items,
    }
}

fn map_prospect(model: ProspectModel) -> Prospect {
    Prospect {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        company: model.company,
        status: match model.status {
            StatusModel::Active => ProspectStatus::Active,
            StatusModel::Inactive => ProspectStatus::Inactive,
        },
        actions: model
            .actions
            .into_iter()
            .map(|action| ActionRecord {
                id: action.id,
                status: match action.status {
                    ActionStatusModel::Open => ActionStatus::Open,
                    ActionStatusModel::Overdue => ActionStatus::Overdue,
                    ActionStatusModel::Closed => ActionStatus::Closed,
                },
                next_contact: action.next_contact,
                created_at: action.created_at,
            })
            .collect(),
        created_at: model.created_at,
    }
}

fn map_client(model: ClientModel) -> ClientRecord {
    ClientRecord {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        company: model.company,
        created_at: model.created_at,
    }
}
