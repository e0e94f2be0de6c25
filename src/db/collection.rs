// src/db/collection.rs

use crate::{
    common::{codes, error::AppError},
    models::{Coded, Record},
};

/// Coleção em memória de um tipo de entidade.
/// Ordem de inserção = recência: o registro mais novo fica na frente.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Busca obrigatória: ausência vira ResourceNotFound.
    pub fn require(&self, id: i64) -> Result<&T, AppError> {
        self.get(id).ok_or(AppError::ResourceNotFound { entity: T::ENTITY, id })
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Substitui o registro de mesmo id, mantendo a posição. Devolve o anterior.
    pub fn replace(&mut self, item: T) -> Result<T, AppError> {
        let id = item.id();
        let slot = self
            .get_mut(id)
            .ok_or(AppError::ResourceNotFound { entity: T::ENTITY, id })?;
        Ok(std::mem::replace(slot, item))
    }

    /// Remove o registro com o id dado. Id desconhecido não altera nada.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Remove todos os registros que satisfazem o predicado, devolvendo-os.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let (removed, kept): (Vec<T>, Vec<T>) =
            self.items.drain(..).partition(|item| predicate(item));
        self.items = kept;
        removed
    }

    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).count()
    }

    pub fn max_id(&self) -> i64 {
        self.items.iter().map(T::id).max().unwrap_or(0)
    }
}

impl<T: Coded> Collection<T> {
    /// Próximo código livre: prefixo + (maior sufixo + 1), com 3 dígitos.
    pub fn next_code(&self) -> String {
        codes::next_code(T::CODE_PREFIX, self.items.iter().map(T::code))
    }
}
