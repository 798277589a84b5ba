/// Generates the id-keyed client methods every resource client shares.
///
/// `$error` must provide a `NotFound($id)` variant and `From<FrameworkError>`.
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: $id) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .get(id.clone())
                        .await
                        .map_err(<$error>::from)?
                        .ok_or(<$error>::NotFound(id))
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](&self, id: $id) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.delete(id.clone()).await.map_err(<$error>::for_id(id))
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake s>](&self, ids: Vec<$id>) -> Result<Vec<$id>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.delete_many(ids).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<count_ $entity_name_snake s>](&self) -> Result<usize, $error> {
                    tracing::debug!("Sending request");
                    self.inner.count().await.map_err(<$error>::from)
                }
            }
        }
    };
}

macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $id, $error, $entity_name_snake);
    };
}
