//! Per-title tables

use super::ArrayMetadata;
use crate::package::Title;
use crate::property::PropertyKind::{Byte, Float, Int, Name, Str, Struct};

/// Arrays every title shares, apart from `TouchTreasureAwards`
const SHARED_ARRAYS: &[(&str, ArrayMetadata)] = &[
    // Static
    ("Currency", ArrayMetadata::fixed(Struct).with_struct_name("CurrencyStruct")),
    ("Stats", ArrayMetadata::fixed(Struct).with_struct_name("PlayerSavedStats")),
    ("NumConsumable", ArrayMetadata::fixed(Int)),
    ("ShowConsumableBadge", ArrayMetadata::fixed(Byte)),
    ("GemCooker", ArrayMetadata::fixed(Struct).with_struct_name("GemCookerData")),
    ("ItemForge", ArrayMetadata::fixed(Struct).with_struct_name("ItemForgeData")),
    ("PotionCauldron", ArrayMetadata::fixed(Struct).with_struct_name("PotionCauldronData")),
    ("SavedCheevo", ArrayMetadata::fixed(Struct).with_struct_name("SavedCheevoData")),
    ("LastEquippedWeaponOfType", ArrayMetadata::fixed(Name)),
    (
        "CharacterEquippedList",
        ArrayMetadata::fixed(Struct).with_struct_name("PlayerEquippedItemList"),
    ),
    // Dynamic
    ("EquippedItemNames", ArrayMetadata::dynamic(Name)),
    ("EquippedItems", ArrayMetadata::dynamic(Name)),
    ("LinkNotificationBadges", ArrayMetadata::dynamic(Struct)),
    ("CurrentKeyItemList", ArrayMetadata::dynamic(Name)),
    ("UsedKeyItemList", ArrayMetadata::dynamic(Name)),
    ("PlayerInventory", ArrayMetadata::dynamic(Struct)),
    ("PlayerUnequippedGems", ArrayMetadata::dynamic(Struct)),
    ("CurrentStoreGems", ArrayMetadata::dynamic(Struct)),
    ("InActivePotionList", ArrayMetadata::dynamic(Struct)),
    ("ActivePotions", ArrayMetadata::dynamic(Struct)),
    ("PurchasedPerks", ArrayMetadata::dynamic(Name)),
    ("GameFlagList", ArrayMetadata::dynamic(Int)),
    ("BossFixedWorldInfo", ArrayMetadata::dynamic(Struct)),
    ("WorldItemOrderList", ArrayMetadata::dynamic(Name)),
    ("TreasureChestOpened", ArrayMetadata::dynamic(Name)),
    ("BossesGeneratedThisBloodline", ArrayMetadata::dynamic(Str)),
    ("PotentialBossElementalAttacks", ArrayMetadata::dynamic(Name)),
    ("PerLevelData", ArrayMetadata::dynamic(Struct)),
    ("CurrentBattleChallengeList", ArrayMetadata::dynamic(Name)),
    ("SavedPersistentBossData", ArrayMetadata::dynamic(Struct)),
    ("HardCoreCurrentQuestData", ArrayMetadata::dynamic(Name)),
    ("LoggedAnalyticsAchievements", ArrayMetadata::dynamic(Name)),
    ("McpAuthorizedServices", ArrayMetadata::dynamic(Name)),
    // Nested inside structs
    ("Gems", ArrayMetadata::dynamic(Struct)),
    ("SocketedGemData", ArrayMetadata::dynamic(Struct)),
    ("Reagents", ArrayMetadata::dynamic(Name)),
    ("BossElementalRandList", ArrayMetadata::dynamic(Float)),
    ("PersistActorCounts", ArrayMetadata::dynamic(Struct)),
    ("DontClearPersistActorCounts", ArrayMetadata::dynamic(Struct)),
    ("SavedItems", ArrayMetadata::dynamic(Name)),
    ("Quests", ArrayMetadata::dynamic(Struct)),
    ("PendingAction", ArrayMetadata::dynamic(Struct)),
    // IB2
    ("PlayerCookerGems", ArrayMetadata::dynamic(Struct)),
    ("SuperBoss", ArrayMetadata::dynamic(Int)),
    ("ActiveBattlePotions", ArrayMetadata::dynamic(Name)),
    ("SocialChallengeSaveEvents", ArrayMetadata::dynamic(Struct)),
    ("GiftedTo", ArrayMetadata::dynamic(Struct)),
    ("GiftedFrom", ArrayMetadata::dynamic(Struct)),
    // IB1
    ("PlaythroughItemsGiven", ArrayMetadata::dynamic(Name)),
    // VOTE
    ("EquippedListO", ArrayMetadata::dynamic(Name)),
    ("EquippedListR", ArrayMetadata::dynamic(Name)),
];

const IB1_ARRAYS: &[(&str, ArrayMetadata)] =
    &[("TouchTreasureAwards", ArrayMetadata::dynamic(Name))];

const IB2_ARRAYS: &[(&str, ArrayMetadata)] =
    &[("TouchTreasureAwards", ArrayMetadata::dynamic(Struct))];

const VOTE_ARRAYS: &[(&str, ArrayMetadata)] = &[
    ("TouchTreasureAwards", ArrayMetadata::dynamic(Struct)),
    ("LastVoteCount", ArrayMetadata::fixed(Int)),
];

/// Every array table entry for `title`
pub(super) fn arrays(title: Title) -> impl Iterator<Item = &'static (&'static str, ArrayMetadata)> {
    let extra = match title {
        Title::Ib1 => IB1_ARRAYS,
        Title::Ib2 | Title::Ib3 => IB2_ARRAYS,
        Title::Vote => VOTE_ARRAYS,
    };
    SHARED_ARRAYS.iter().chain(extra)
}

/// Static arrays whose element index is named by an enumeration
pub(super) fn index_names(title: Title) -> IndexTable {
    match title {
        Title::Ib1 | Title::Ib2 => IB2_INDEX_NAMES,
        Title::Ib3 => IB3_INDEX_NAMES,
        Title::Vote => VOTE_INDEX_NAMES,
    }
}

type IndexTable = &'static [(&'static str, &'static [&'static str])];

const IB2_INDEX_NAMES: IndexTable = &[
    ("NumConsumable", TOUCH_REWARD_ACTORS_IB2),
    ("SavedCheevo", ACHIEVEMENTS_IB2),
];

const IB3_INDEX_NAMES: IndexTable = &[
    ("NumConsumable", TOUCH_REWARD_ACTORS_IB3),
    ("SavedCheevo", ACHIEVEMENTS_IB3),
];

const VOTE_INDEX_NAMES: IndexTable = &[("LastVoteCount", CHARACTER_FILTERS)];

/// Standalone structs whose type name differs from their property name
pub(super) const STRUCT_ALIASES: &[(&str, &str)] = &[
    ("Data", "ItemEnhanceData"),
    ("ForcedMapVariation", "BossMapDefinition"),
    ("CurrentTotalTrackingStats", "BattleTrackingStats"),
    ("GameOptions", "PersistGameOptions"),
];

/// Int properties named like plain bytes
pub(super) const BYTE_PREFIXED_INTS: &[&str] = &["bWasEncrypted"];

/// Enum bytes whose name already carries the enum prefix
pub(super) const ENUM_PREFIXED_NAMES: &[&str] = &["eCurrentPlayerType"];

// eTouchRewardActor (IB3)
const TOUCH_REWARD_ACTORS_IB3: &[&str] = &[
    "TRA_Random",
    "TRA_Random_Potion",
    "TRA_Random_Gold",
    "TRA_Random_Key",
    "TRA_Random_Gem",
    "TRA_Random_Item",
    "TRA_Random_World",
    "TRA_None",
    "TRA_Gold_Small",
    "TRA_Gold_Medium",
    "TRA_Gold_Large",
    "TRA_Key_Small",
    "TRA_Key_Medium",
    "TRA_Key_Large",
    "TRA_Key_Item",
    "TRA_Gem_Fixed",
    "TRA_Item_Fixed",
    "TRA_Item_Weapon",
    "TRA_Item_Shield",
    "TRA_Item_Armor",
    "TRA_Item_Helmet",
    "TRA_Item_Magic",
    "TRA_GrabBag_Small",
    "TRA_GrabBag_Medium",
    "TRA_GrabBag_Large",
    "TRA_GrabBag_SmallGem",
    "TRA_GrabBag_MediumGem",
    "TRA_GrabBag_LargeGem",
    "TRA_GrabBag_Uber",
    "TRA_Potion_HealthL",
    "TRA_Potion_Fixed",
    "TRA_World_1_Cactus",
    "TRA_World_2_Berries",
    "TRA_World_3_PinkPlant",
    "TRA_World_4_Reeds",
    "TRA_World_5_DesertBulb",
    "TRA_World_6_Mushroom",
    "TRA_World_7_Root",
    "TRA_World_8_Butterfly",
    "TRA_World_9_Skullfly",
    "TRA_World_10_Cocoon",
    "TRA_World_11_Bones",
    "TRA_World_12_Future",
    "TRA_World_13_Future",
    "TRA_World_14_Future",
    "TRA_World_15_Future",
    "TRA_World_16_Future",
    "TRA_Chips_Small",
    "TRA_Chips_Medium",
    "TRA_Chips_Large",
    "TRA_MAX",
];

// eAchievements (IB3)
const ACHIEVEMENTS_IB3: &[&str] = &[
    "A_NONE",
    "TRACK_Combo",
    "TRACK_Parry",
    "TRACK_Dodge",
    "TRACK_Block",
    "TRACK_Magic",
    "TRACK_BonusCombo",
    "TRACK_SuperMove",
    "TRACK_Stab",
    "TRACK_FinishingHit",
    "TRACK_PerfectParry",
    "TRACK_PerfectBlock",
    "TRACK_SuperDodge",
    "TRACK_SirisLevel",
    "TRACK_IsaLevel",
    "TRACK_MasteredItem",
    "TRACK_Forge",
    "TRACK_ItemLevel",
    "TRACK_GemCook",
    "TRACK_PotionCraft",
    "TRACK_PotionUse",
    "TRACK_GrabBags",
    "TRACK_Ingredients",
    "TRACK_Merchant",
    "TRACK_ClashMob",
    "GOAL_Gold",
    "GOAL_InfinityBlade",
    "GOAL_Combat1",
    "GOAL_Combat2",
    "GOAL_Combat3",
    "GOAL_Combat4",
    "GOAL_Combat5",
    "GOAL_Combat6",
    "PROG_Story1",
    "PROG_Story2",
    "PROG_Story3",
    "PROG_Story4",
    "PROG_Story5",
    "PROG_Story6",
    "PROG_Story7",
    "PROG_Story8",
    "PROG_Story9",
    "PROG_Story10",
    "PROG_Story11",
    "PROG_Story12",
    "PROG_NewGamePlus",
    "TRACK_TitanKill",
    "TRACK_Slash",
    "TRACK_RealPerfectParry",
    "TRACK_ArenaMode",
    "TRACK_DeathlessQuest",
    "TRACK_BossPerkKils",
    "GOAL_Collector1",
    "GOAL_Collector2",
    "GOAL_HolidayHelm1",
    "GOAL_HolidayHelm2",
    "GOAL_HolidayHelm3",
    "GOAL_HolidayHelm4",
    "GOAL_HolidayHelm5",
    "GOAL_HolidayHelm6",
    "GOAL_HolidayHelm7",
    "GOAL_HolidayHelm8",
    "GOAL_HolidayHelm9",
    "GOAL_HolidayHelm10",
    "GOAL_HolidayHelmAll",
    "TRACK_AvatarEquipmentCost",
    "AIB3_MAX_CHEEVO",
    "TRACK_Weekly",
    "eAchievements_MAX",
];

// eTouchRewardActor (IB1, IB2)
const TOUCH_REWARD_ACTORS_IB2: &[&str] = &[
    "TRA_Random",
    "TRA_Random_Potion",
    "TRA_Random_Gold",
    "TRA_Random_Key",
    "TRA_Random_Gem",
    "TRA_Random_Item",
    "TRA_None",
    "TRA_Gold_Small",
    "TRA_Gold_Medium",
    "TRA_Gold_Large",
    "TRA_Key_Small",
    "TRA_Key_Medium",
    "TRA_Key_Large",
    "TRA_Key_Item",
    "TRA_Gem_Fixed",
    "TRA_Item_Fixed",
    "TRA_Item_Weapon",
    "TRA_Item_Shield",
    "TRA_Item_Armor",
    "TRA_Item_Helmet",
    "TRA_Item_Magic",
    "TRA_GrabBag_Small",
    "TRA_GrabBag_Medium",
    "TRA_GrabBag_Large",
    "TRA_GrabBag_SmallGem",
    "TRA_GrabBag_MediumGem",
    "TRA_GrabBag_LargeGem",
    "TRA_GrabBag_Uber",
    "TRA_Potion_HealthL",
    "TRA_Potion_HealthRegen",
    "TRA_Potion_ShieldRegen",
    "TRA_Potion_EasyParry",
    "TRA_Potion_HealthM",
    "TRA_Potion_HealthS",
    "TRA_Potion_HealthRegenL",
    "TRA_Potion_DoubleXP",
    "TRA_Potion_New5",
    "TRA_Potion_New6",
    "TRA_Potion_New7",
    "TRA_Potion_New8",
    "TRA_Potion_New9",
    "TRA_MAX",
];

// eAchievements (IB1, IB2)
const ACHIEVEMENTS_IB2: &[&str] = &[
    "A_NONE",
    "IB2_Combo1",
    "IB2_Block1",
    "IB2_Parry1",
    "IB2_Parry2",
    "IB2_Dodge1",
    "IB2_Stab1",
    "IB2_PerfectBlock1",
    "IB2_PerfectParry1",
    "IB2_PerfectSlash1",
    "IB2_Level1",
    "IB2_Level2",
    "IB2_Gold1",
    "IB2_Treasure1",
    "IB2_ModifiedItems1",
    "IB2_GrabBags1",
    "IB2_Master1",
    "IB2_Master2",
    "IB2_InfinityBlade",
    "IB2_ClashMob1",
    "IB2_ClashMob2",
    "IB2_WinWOTakingDamage_SnS",
    "IB2_WinWOTakingDamage_2S",
    "IB2_WinWOTakingDamage_2H",
    "IB2_WinWOAttacking",
    "IB2_AllEquippedModified",
    "IB2_KillUberBoss1",
    "IB2_KillUberBoss2",
    "IB2_KillUberBoss3",
    "IB2_KillUberBoss4",
    "IB2_KillUberBoss5",
    "IB2_NewGamePlus",
    "IB2_KillUberBoss6",
    "IB2_KillUberBoss7",
    "IB2_KillUberBoss8",
    "IB2_KillUberBoss9",
    "IB2_GemCooker1",
    "IB2_GemCooker2",
    "IB2_GemCooker3",
    "IB2_TreasureMapUsed",
    "IB2_TreasureMapCollected",
    "IB2_MeetTEL",
    "IB2_EquipLaserWeapon",
    "IB2_ModifyALaserWeapon",
    "IB2_KillUberBoss10",
    "IB2_KillUberBoss11",
    "IB2_KillUberBoss12",
    "IB2_SpareUberBoss",
    "IB2_FindUberBoss",
    "IB2_GemCooker4",
    "IB2_ItemSet",
    "IB2_NegaGodKing",
    "AIB2_MAX_CHEEVO",
    "eAchievements_MAX",
];

// CharacterFilterEnum (VOTE)
const CHARACTER_FILTERS: &[&str] = &["CFE_All", "CFE_Obama", "CFE_Romney", "CFE_MAX"];
