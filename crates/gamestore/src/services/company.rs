//! Company service.
//!
//! Companies are read straight from the repository. Renaming a company
//! rewrites the company name stored on its devices, and deleting a company
//! removes its devices and its picture as well.

use std::sync::Arc;

use gamestore_core::service::{Result, ServiceError};
use gamestore_core::storage::{
    PageParameters, PaginatedList, QuerySpec, Repository, RepositoryError,
};
use gamestore_core::store::{validate_company, Company, Device};

use super::pictures::{PictureStore, PictureUpload, COMPANY_PICTURES};

pub struct CompanyService {
    companies: Arc<dyn Repository<Company>>,
    devices: Arc<dyn Repository<Device>>,
    pictures: Arc<dyn PictureStore>,
}

impl CompanyService {
    pub fn new(
        companies: Arc<dyn Repository<Company>>,
        devices: Arc<dyn Repository<Device>>,
        pictures: Arc<dyn PictureStore>,
    ) -> Self {
        Self {
            companies,
            devices,
            pictures,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Company> {
        match self.companies.get_by_id(id).await? {
            Some(company) => {
                tracing::info!(company_id = id, "Retrieved company");
                Ok(company)
            }
            None => {
                tracing::warn!(company_id = id, "Company not found");
                Err(ServiceError::NotFound {
                    entity_type: "Company",
                    id,
                })
            }
        }
    }

    pub async fn get_all(&self, page: PageParameters) -> Result<PaginatedList<Company>> {
        let companies = self.companies.get_page(page, &QuerySpec::all()).await?;
        tracing::info!(
            page_number = page.page_number,
            total = companies.total_count,
            "Retrieved companies"
        );
        Ok(companies)
    }

    /// Creates a company, then stores its picture under its id and name.
    pub async fn create(&self, name: String, picture: Option<PictureUpload>) -> Result<Company> {
        let company = Company::new(name);
        validate_company(&company)?;

        let mut created = self
            .companies
            .create(&company)
            .await
            .map_err(|err| self.write_failed(err, &company))?;

        // The file is named after the id, which exists only after the insert.
        if let Some(link) = self
            .pictures
            .upload(picture.as_ref(), COMPANY_PICTURES, created.id, &created.name)
            .await?
        {
            created.picture = Some(link);
            self.companies.update(&created).await?;
        }

        tracing::info!(company_id = created.id, name = %created.name, "Created company");
        Ok(created)
    }

    /// Renames a company. Without a new picture the current one is kept.
    pub async fn update(&self, id: i64, name: String, picture: Option<PictureUpload>) -> Result<()> {
        let mut company = self.get_by_id(id).await?;
        let renamed = company.name != name;
        company.name = name;
        validate_company(&company)?;

        self.companies
            .update(&company)
            .await
            .map_err(|err| self.write_failed(err, &company))?;

        if renamed {
            self.rename_devices(&company).await?;
        }

        if let Some(link) = self
            .pictures
            .upload(picture.as_ref(), COMPANY_PICTURES, company.id, &company.name)
            .await?
        {
            if let Some(old) = company.picture.replace(link.clone()) {
                if old != link {
                    self.pictures.delete(&old).await?;
                }
            }
            self.companies.update(&company).await?;
        }

        tracing::info!(company_id = id, "Updated company");
        Ok(())
    }

    /// Deletes a company together with its devices and picture.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let company = self.get_by_id(id).await?;

        let devices = self
            .devices
            .find(&QuerySpec::where_eq("company_id", id))
            .await?;
        for device in &devices {
            self.devices.delete(device.id).await?;
        }

        self.companies.delete(id).await?;
        if let Some(link) = &company.picture {
            self.pictures.delete(link).await?;
        }

        tracing::info!(company_id = id, devices = devices.len(), "Deleted company");
        Ok(())
    }

    /// Rewrites the company name stored on each of the company's devices.
    async fn rename_devices(&self, company: &Company) -> Result<()> {
        let devices = self
            .devices
            .find(&QuerySpec::where_eq("company_id", company.id))
            .await?;

        for device in &devices {
            if device.company_name.as_deref() != Some(company.name.as_str()) {
                let renamed = device.clone().with_company_name(company.name.clone());
                self.devices.update(&renamed).await?;
            }
        }

        tracing::debug!(
            company_id = company.id,
            devices = devices.len(),
            "Renamed company on devices"
        );
        Ok(())
    }

    fn write_failed(&self, err: RepositoryError, company: &Company) -> ServiceError {
        let err = ServiceError::from_write(err, company);
        if let ServiceError::NameNotUnique { value, .. } = &err {
            tracing::warn!(name = %value, "Company name is already taken");
        }
        err
    }
}
