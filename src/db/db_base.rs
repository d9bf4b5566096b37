//! Base implementation of a File Database for Struct

use crate::error::{Error, Result};
use crate::models::{HasId, Sortable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Clone)]
pub struct StructFileDb<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    db: Arc<Mutex<BaseStructFileDb<T>>>,
}

impl<T> StructFileDb<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(file_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(StructFileDb::<T> {
            db: Arc::new(Mutex::new(BaseStructFileDb::<T>::new(file_path.into())?)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BaseStructFileDb<T>> {
        // data is only replaced after a successful write, a poisoned lock still holds valid data
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn save(&self, data: Vec<T>) -> Result<()> {
        let mut mutex = self.lock();
        mutex.write(&data)?;
        mutex.data = data;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        self.lock().reload()
    }

    pub fn data(&self) -> Vec<T> {
        self.lock().data.clone()
    }

    pub fn is_data_empty(&self) -> bool {
        self.lock().data.is_empty()
    }

    /// Items matching `predicate`, in stored order.
    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.lock()
            .data
            .iter()
            .filter(|it| predicate(it))
            .cloned()
            .collect()
    }
}

impl<T> StructFileDb<T>
where
    T: Serialize + DeserializeOwned + Clone + HasId + Sortable,
{
    /// Sorts `data` and writes it; memory is only replaced once the file write succeeded.
    fn commit(&self, mutex: &mut MutexGuard<BaseStructFileDb<T>>, mut data: Vec<T>) -> Result<()> {
        data.sort_by(|a, b| a.sortable_value().cmp(&b.sortable_value()));
        mutex.write(&data)?;
        mutex.data = data;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<T> {
        self.lock().data.iter().find(|x| x.id() == id).cloned()
    }

    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        self.delete_where(|x| x.id() == id).map(|_| ())
    }

    /// Removes every item matching `predicate`, returns how many were removed.
    pub fn delete_where<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&T) -> bool,
    {
        let mut mutex = self.lock();
        let mut data = mutex.data.clone();
        data.retain(|x| !predicate(x));
        let removed = mutex.data.len() - data.len();
        if removed > 0 {
            self.commit(&mut mutex, data)?;
        }
        Ok(removed)
    }

    pub fn upsert(&self, item: T) -> Result<()> {
        let mut mutex = self.lock();
        let mut data = mutex.data.clone();
        if let Some(index) = data.iter().position(|x| x.id() == item.id()) {
            debug!("Update {} with id {}", std::any::type_name::<T>(), item.id());
            data[index] = item;
        } else {
            debug!("Insert {} with id {}", std::any::type_name::<T>(), item.id());
            data.push(item);
        }
        self.commit(&mut mutex, data)
    }

    /// Applies `change` to the item with `id` and persists it, if the item exists.
    pub fn update<F>(&self, id: &str, change: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut mutex = self.lock();
        let Some(index) = mutex.data.iter().position(|x| x.id() == id) else {
            return Ok(None);
        };
        let mut data = mutex.data.clone();
        change(&mut data[index]);
        let updated = data[index].clone();
        self.commit(&mut mutex, data)?;
        Ok(Some(updated))
    }

    /// Applies `change` to every item matching `predicate` in one write and returns the
    /// changed items. Other callers never see a matching item twice.
    pub fn update_where<P, F>(&self, predicate: P, change: F) -> Result<Vec<T>>
    where
        P: Fn(&T) -> bool,
        F: Fn(&mut T),
    {
        let mut mutex = self.lock();
        let mut data = mutex.data.clone();
        let mut changed = Vec::new();
        for item in data.iter_mut().filter(|it| predicate(it)) {
            change(item);
            changed.push(item.clone());
        }
        if !changed.is_empty() {
            self.commit(&mut mutex, data)?;
        }
        Ok(changed)
    }
}

struct BaseStructFileDb<T: Serialize + DeserializeOwned> {
    file_path: PathBuf,
    data: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> BaseStructFileDb<T> {
    fn new(file_path: PathBuf) -> Result<Self> {
        let content = if !fs::exists(&file_path)? {
            if let Some(folder_path) = file_path.parent() {
                if !folder_path.as_os_str().is_empty() && !fs::exists(folder_path)? {
                    fs::create_dir_all(folder_path)?;
                    info!("Created folder: {}", folder_path.display());
                }
            }

            File::create(&file_path)?;
            info!("Created file: {}", file_path.display());
            String::new()
        } else {
            fs::read_to_string(&file_path)?
        };

        let data: Vec<T> = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)?
        };

        Ok(BaseStructFileDb::<T> { file_path, data })
    }

    fn write(&self, data: &[T]) -> Result<()> {
        let content = serde_json::to_string_pretty(data)?;

        let mut tmp_path = self.file_path.clone().into_os_string();
        tmp_path.push(".tmp");
        let mut file = File::create(&tmp_path)?; // this truncates the exiting file if any
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.file_path)?; // this replaces the existing file

        debug!("Saved file: {}", self.file_path.display());

        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        if !fs::exists(&self.file_path)? {
            return if self.data.is_empty() {
                Ok(())
            } else {
                Err(Error::NotFound(format!(
                    "{} does not exist and data is not empty",
                    self.file_path.display()
                )))
            };
        }

        let content = fs::read_to_string(&self.file_path)?;
        self.data = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)?
        };

        Ok(())
    }
}
