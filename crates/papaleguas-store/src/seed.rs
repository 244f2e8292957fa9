use papaleguas_types::models::{NewTimelineEntry, NewUser, User};
use tracing::info;

use crate::{Result, Store};

const HISTORY: &[(&str, &str, &str, &str)] = &[
    (
        "O Início",
        "A Papaléguas Mudanças começou com apenas um caminhão e três funcionários. Com dedicação e comprometimento, rapidamente conquistamos a confiança de nossos primeiros clientes.",
        "2005",
        "https://images.unsplash.com/photo-1635350736475-c8cef4b21906?auto=format&fit=crop&w=500&q=80",
    ),
    (
        "Expansão",
        "Após 5 anos de sucesso, expandimos nossa frota para 5 caminhões e contratamos mais profissionais qualificados. Começamos a atender cidades vizinhas e ampliamos nossos serviços.",
        "2010",
        "https://images.unsplash.com/photo-1566576912321-d58ddd7a6088?auto=format&fit=crop&w=500&q=80",
    ),
    (
        "Modernização",
        "Investimos em tecnologia e inovação, implementando um sistema de rastreamento de veículos e um software de gestão de mudanças para oferecer maior transparência e eficiência.",
        "2015",
        "https://images.unsplash.com/photo-1617529497471-9218633199c0?auto=format&fit=crop&w=500&q=80",
    ),
    (
        "Reconhecimento",
        "Fomos reconhecidos como uma das melhores empresas de mudanças da região, recebendo prêmios de excelência em serviço e satisfação do cliente.",
        "2020",
        "https://images.unsplash.com/photo-1589829545856-d10d557cf95f?auto=format&fit=crop&w=500&q=80",
    ),
    (
        "Referência no Mercado",
        "Atualmente, contamos com uma frota moderna, equipe especializada e processos otimizados para oferecer o melhor serviço de mudanças do mercado.",
        "Hoje",
        "https://images.unsplash.com/photo-1563986768609-322da13575f3?auto=format&fit=crop&w=500&q=80",
    ),
];

impl Store {
    /// Create the admin account. `password_hash` must already be a PHC string.
    pub fn seed_admin(&self, username: &str, password_hash: String) -> Result<User> {
        let user = self.create_user(NewUser { username: username.to_string(), password_hash })?;
        info!("Seeded admin user '{}' (id {})", user.username, user.id);
        Ok(user)
    }

    /// Insert the company history, orders 1 through 5.
    pub fn seed_timeline(&self) -> Result<()> {
        for (order, (title, description, year, image_url)) in HISTORY.iter().enumerate() {
            self.create_timeline_entry(NewTimelineEntry {
                title: title.to_string(),
                description: description.to_string(),
                year: year.to_string(),
                image_url: Some(image_url.to_string()),
                order: order as i64 + 1,
            })?;
        }
        info!("Seeded {} timeline entries", HISTORY.len());
        Ok(())
    }
}
