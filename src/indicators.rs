/// ESG dimension a guideline belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Environnement,
    Social,
    Gouvernance,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Environnement,
        Dimension::Social,
        Dimension::Gouvernance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Environnement => "Environnement",
            Dimension::Social => "Social",
            Dimension::Gouvernance => "Gouvernance",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One municipal reporting guideline: what to look for and where it counts
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub name: &'static str,
    pub description: &'static str,
    pub dimension: Dimension,
}

impl Indicator {
    /// Retrieval query used to interrogate the knowledge base about this
    /// indicator
    pub fn query(&self) -> String {
        format!("{}. {}", self.name, self.description)
    }
}

/// All indicators, filtered to one dimension, in catalog order
pub fn by_dimension(dimension: Dimension) -> impl Iterator<Item = &'static Indicator> {
    GUIDELINES.iter().filter(move |g| g.dimension == dimension)
}

/// Case-insensitive lookup by indicator name
pub fn find(name: &str) -> Option<&'static Indicator> {
    GUIDELINES
        .iter()
        .find(|g| g.name.to_lowercase() == name.to_lowercase())
}

/// The guideline catalog for municipal sustainability reporting
pub const GUIDELINES: &[Indicator] = &[
    Indicator {
        name: "Politiques ou stratégies de développement durable",
        description: "Si la municipalité a une stratégie claire ou un plan d’action bien structuré, c’est un bon signe de proactivité. Si c’est juste mentionné en passant, c’est plus réactif.",
        dimension: Dimension::Gouvernance,
    },
    Indicator {
        name: "Densité de la population urbaine",
        description: "S’ils parlent de densification, d’optimisation du territoire ou de mixité urbaine, c’est un geste planifié. Sinon, silence ou traitement passif.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Consommation d’eau",
        description: "Une municipalité proactive va avoir des données, des cibles ou des mesures concrètes pour réduire l’usage de l’eau. Une simple mention sans action, c’est moins engagé.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Empreinte écologique",
        description: "Parler d’empreinte écologique ou de bilan carbone avec des objectifs de réduction montre une vraie intention durable. Sinon, c’est flou ou absent.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Santé de la population",
        description: "Un diagnostic clair ou des actions liées à la santé des citoyen·ne·s, c’est un marqueur d’attention au bien-être collectif.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Transport en commun",
        description: "Un plan de transport collectif ou des cibles d’augmentation des usagers, c’est proactif. Sinon, ça reste au niveau des intentions.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Espaces naturels protégés",
        description: "Si la conservation de la biodiversité est planifiée avec des superficies ou des projets concrets, ça montre une vraie volonté environnementale.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Coût de la vie",
        description: "Une municipalité qui s’attaque à l’abordabilité (logement, services) en lien avec le développement durable démontre une approche équitable.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Taux d’activité",
        description: "Si on parle de participation active à l’économie locale avec des mesures pour l’emploi, c’est un signe de vitalité et de cohésion sociale.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Création d’emplois",
        description: "Mentionner la création d’emplois durables ou l’économie verte, c’est un plus du point de vue du développement durable.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Revenu des ménages",
        description: "Un suivi du revenu et des écarts de richesse montre une attention aux enjeux d’inégalités. S’il y a des objectifs ou des actions, c’est encore mieux.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Effort logement (30 % et +)",
        description: "Si le fardeau du logement est identifié et qu’il y a des solutions proposées, la ville est proactive socialement.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Niveau de scolarité",
        description: "Des données ou projets pour améliorer la formation de base ou continue, c’est une approche durable axée sur les capacités.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Taux de chômage",
        description: "Un traitement actif du chômage avec des programmes ou du soutien à l’emploi est un bon indicateur d’inclusion socioéconomique.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Inégalités de revenu",
        description: "Parler des écarts de revenu et chercher à les réduire est un geste clair vers une transition juste.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Aide sociale",
        description: "Une mention seule est faible, mais des actions pour diminuer la dépendance ou accompagner les personnes, c’est proactif.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Faibles revenus",
        description: "Identifier les ménages à faibles revenus et proposer des solutions démontre une vision sociale du développement durable.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Criminalité",
        description: "Aborder la sécurité de manière préventive ou communautaire est un signal positif pour un cadre de vie durable.",
        dimension: Dimension::Social,
    },
    Indicator {
        name: "Participation électorale",
        description: "Une ville qui se soucie de la participation démocratique (et agit pour l’augmenter) est plus proactive en gouvernance.",
        dimension: Dimension::Gouvernance,
    },
    Indicator {
        name: "Participation citoyenne",
        description: "Des mécanismes clairs, fréquents et ouverts de participation sont un excellent indicateur d’engagement durable.",
        dimension: Dimension::Gouvernance,
    },
    Indicator {
        name: "Énergie renouvelable",
        description: "Si le document mentionne l’augmentation de l’énergie renouvelable ou des investissements dans ce sens, c’est clairement proactif.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Entreprises certifiées",
        description: "Une valorisation ou un accompagnement des entreprises vers des certifications environnementales, c’est une stratégie intelligente.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Recyclage (déchets détournés)",
        description: "Des taux de détournement élevés ou des plans d’amélioration montrent que la ville agit sur la réduction des déchets.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Particules PM10 (qualité de l’air)",
        description: "Si la qualité de l’air est suivie et que des mesures sont prises, la santé environnementale est prise au sérieux.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Émissions de GES (hors transport)",
        description: "Si la ville mesure, suit et agit sur les GES en dehors du transport, elle s’inscrit dans une vraie trajectoire de transition.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Bruit nocturne",
        description: "Mentionner le bruit, surtout nocturne, et proposer des mesures, c’est une marque de sensibilité à la qualité de vie.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Qualité des cours d’eau",
        description: "Des analyses de l’eau ou des projets de restauration ou de protection, c’est un engagement environnemental fort.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Déchets enfouis (résidentiels)",
        description: "Une baisse des déchets enfouis, appuyée par des plans d’action, montre que la gestion des matières résiduelles est prise au sérieux.",
        dimension: Dimension::Environnement,
    },
    Indicator {
        name: "Activités sportives (parcs, piscines)",
        description: "L’accessibilité aux loisirs publics et leur fréquentation témoignent d’un souci de qualité de vie et de santé publique.",
        dimension: Dimension::Social,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_all_dimensions() {
        assert_eq!(GUIDELINES.len(), 29);
        assert_eq!(by_dimension(Dimension::Environnement).count(), 13);
        assert_eq!(by_dimension(Dimension::Social).count(), 13);
        assert_eq!(by_dimension(Dimension::Gouvernance).count(), 3);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let found = find("consommation d’eau").unwrap();
        assert_eq!(found.dimension, Dimension::Environnement);
        assert!(find("indicateur inconnu").is_none());
    }

    #[test]
    fn query_combines_name_and_description() {
        let indicator = &GUIDELINES[0];
        let query = indicator.query();
        assert!(query.starts_with(indicator.name));
        assert!(query.ends_with(indicator.description));
    }
}
